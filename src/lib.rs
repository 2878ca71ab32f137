//! mpfs-rs: encoder and decoder for MPFS2 filesystem images
//!
//! MPFS2 is the flat, read-only image format served by embedded TCP/IP
//! stacks. An image is an 8-byte header, a table of 24-byte FAT entries,
//! a block of null-terminated names and a block of file data, all
//! addressed by absolute offsets.
//!
//! The codec works on whole in-memory buffers. Each call is independent
//! and takes its [`CodecConfig`] explicitly.
//!
//! # Example
//!
//! ```
//! use mpfs_rs::{decode, encode, CodecConfig, FileFlags, FileRecord};
//!
//! let records = vec![
//!     FileRecord::new("index.htm", b"<html/>".to_vec()),
//!     FileRecord::new("index.ht#", vec![0u8, 1]),
//! ];
//! let image = encode(&records, 1024)?;
//!
//! let decoded = decode(&image, &CodecConfig::default())?;
//! assert_eq!(decoded[0].name, "index.htm");
//! assert!(decoded[0].flags.contains(FileFlags::INDEXED));
//! assert!(decoded.iter().all(|r| r.name_hash_ok));
//! # Ok::<(), mpfs_rs::MpfsError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use archive::{
    decode, derive_flags, encode, encode_with, name_hash, FatEntry, FileFlags, FileInfo,
    FileRecord, ImageHeader, ImageReader, ImageWriter, DEFAULT_MAX_IMAGE_SIZE, FAT_ENTRY_SIZE,
    FORMAT_VERSION, HEADER_SIZE, SIGNATURE,
};
pub use config::CodecConfig;
pub use error::{CapacityError, FormatError, MpfsError, Result};
