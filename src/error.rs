use std::io;
use thiserror::Error;

/// Result type for MPFS operations
pub type Result<T> = std::result::Result<T, MpfsError>;

/// Structural problems with an image, or with records that cannot be laid out.
///
/// Always fatal: a decode or encode call that hits one of these returns no
/// partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Truncated image: need {needed} bytes, have {actual}")]
    Truncated { needed: u64, actual: u64 },

    #[error("Invalid signature: expected \"MPFS\", found {0:02X?}")]
    InvalidSignature([u8; 4]),

    #[error("Unsupported version: {0} (expected 2)")]
    UnsupportedVersion(u16),

    #[error(
        "Corrupt {field} in FAT entry {index}: range {offset}..{end} exceeds image length {image_len}"
    )]
    CorruptOffset {
        index: usize,
        field: &'static str,
        offset: u64,
        end: u64,
        image_len: u64,
    },

    #[error("Unterminated name in FAT entry {index} at offset {name_addr}")]
    UnterminatedName { index: usize, name_addr: u32 },

    #[error("Invalid name in FAT entry {index}: {reason}")]
    InvalidName { index: usize, reason: String },

    #[error("Too many files: {0} (max 65535)")]
    TooManyFiles(usize),

    #[error("Image offset {0} does not fit in a 32-bit FAT field")]
    FieldOverflow(u64),
}

/// Image size above the configured ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Image too large: {actual} bytes exceeds limit of {limit} bytes")]
pub struct CapacityError {
    pub actual: u64,
    pub limit: u64,
}

/// Unified error type for all MPFS operations
#[derive(Debug, Error)]
pub enum MpfsError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error("Refusing to build an image with no files")]
    EmptyImage,

    #[error("File not found in image: {0}")]
    FileNotFound(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for MpfsError {
    fn from(err: toml::de::Error) -> Self {
        MpfsError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MpfsError {
    fn from(err: toml::ser::Error) -> Self {
        MpfsError::Config(err.to_string())
    }
}
