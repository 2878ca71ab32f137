mod flags;
mod format;
mod hash;
mod reader;
mod validate;
mod writer;

pub use flags::{
    derive_flags, index_companion_name, indexed_flag, strip_compressed_suffix, FileFlags,
    COMPRESSED_SUFFIX, INDEX_MARKER,
};
pub use format::{
    FatEntry, FileRecord, ImageHeader, DEFAULT_MAX_IMAGE_SIZE, FAT_ENTRY_SIZE, FORMAT_VERSION,
    HEADER_SIZE, SIGNATURE,
};
pub use hash::name_hash;
pub use reader::{decode, FileInfo, ImageReader};
pub use validate::check_image_size;
pub use writer::{encode, encode_with, ImageWriter};
