//! Bounds and consistency checks shared by the decoder and the encoder

use crate::archive::format::{ImageHeader, FORMAT_VERSION, SIGNATURE};
use crate::archive::hash::name_hash;
use crate::error::{CapacityError, FormatError};

/// Enforce the configured image size ceiling
pub fn check_image_size(actual: u64, limit: u64) -> Result<(), CapacityError> {
    if actual > limit {
        return Err(CapacityError { actual, limit });
    }
    Ok(())
}

/// Require at least `needed` bytes in an image of `actual` bytes
pub fn check_min_len(needed: u64, actual: u64) -> Result<(), FormatError> {
    if actual < needed {
        return Err(FormatError::Truncated { needed, actual });
    }
    Ok(())
}

/// Verify signature, then version
pub fn check_header(header: &ImageHeader) -> Result<(), FormatError> {
    if header.signature != SIGNATURE {
        return Err(FormatError::InvalidSignature(header.signature));
    }
    if header.version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion(header.version));
    }
    Ok(())
}

/// Check that `offset..offset + len` lies inside the image and return its end
pub fn check_range(
    index: usize,
    field: &'static str,
    offset: u64,
    len: u64,
    image_len: u64,
) -> Result<u64, FormatError> {
    // u32 + u32 cannot overflow u64
    let end = offset + len;
    if end > image_len {
        return Err(FormatError::CorruptOffset {
            index,
            field,
            offset,
            end,
            image_len,
        });
    }
    Ok(end)
}

/// Narrow an image offset to a 32-bit FAT field
pub fn to_fat_field(value: u64) -> Result<u32, FormatError> {
    u32::try_from(value).map_err(|_| FormatError::FieldOverflow(value))
}

/// Compare a stored name hash against a fresh hash of the decoded name
pub fn name_hash_matches(name: &str, stored: u16) -> bool {
    name_hash(name) == stored
}
