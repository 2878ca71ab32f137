use crate::archive::flags::{FileFlags, COMPRESSED_SUFFIX};
use crate::error::Result;
use std::io::{Read, Write};

/// Signature at offset 0 of every image
pub const SIGNATURE: [u8; 4] = *b"MPFS";

/// The only image version this crate reads or writes
pub const FORMAT_VERSION: u16 = 2;

/// Header size in bytes: signature, version, file count
pub const HEADER_SIZE: usize = 8;

/// FAT entry size in bytes
pub const FAT_ENTRY_SIZE: usize = 24;

/// Default ceiling on image size (64 MiB)
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 64 * 1024 * 1024;

/// Image header at offset 0
///
/// Structure (8 bytes, little-endian):
/// - Signature: "MPFS" (4 bytes)
/// - Version: uint16 (2 bytes)
/// - File Count: uint16 (2 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub signature: [u8; 4],
    pub version: u16,
    pub file_count: u16,
}

impl ImageHeader {
    pub fn new(file_count: u16) -> Self {
        Self {
            signature: SIGNATURE,
            version: FORMAT_VERSION,
            file_count,
        }
    }

    /// Byte offset just past the FAT
    pub fn fat_end(&self) -> u64 {
        HEADER_SIZE as u64 + self.file_count as u64 * FAT_ENTRY_SIZE as u64
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.signature)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.file_count.to_le_bytes())?;
        Ok(())
    }

    /// Read the raw header fields. Signature and version are not checked here.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        let version = read_u16(&mut reader)?;
        let file_count = read_u16(&mut reader)?;

        Ok(Self {
            signature,
            version,
            file_count,
        })
    }
}

/// One FAT record
///
/// Structure (24 bytes, little-endian):
/// - Name Hash: uint16
/// - Flags: uint16
/// - Name Address: uint32 (absolute offset of the null-terminated name)
/// - Data Address: uint32 (absolute offset of the file data)
/// - Length: uint32
/// - Timestamp: uint32 (seconds since the Unix epoch)
/// - Microtime: uint32 (opaque)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatEntry {
    pub name_hash: u16,
    pub flags: FileFlags,
    pub name_addr: u32,
    pub data_addr: u32,
    pub length: u32,
    pub timestamp: u32,
    pub microtime: u32,
}

impl FatEntry {
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.name_hash.to_le_bytes())?;
        writer.write_all(&self.flags.bits().to_le_bytes())?;
        writer.write_all(&self.name_addr.to_le_bytes())?;
        writer.write_all(&self.data_addr.to_le_bytes())?;
        writer.write_all(&self.length.to_le_bytes())?;
        writer.write_all(&self.timestamp.to_le_bytes())?;
        writer.write_all(&self.microtime.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let name_hash = read_u16(&mut reader)?;
        // Unknown bits are kept so they survive a decode/encode cycle.
        let flags = FileFlags::from_bits_retain(read_u16(&mut reader)?);
        let name_addr = read_u32(&mut reader)?;
        let data_addr = read_u32(&mut reader)?;
        let length = read_u32(&mut reader)?;
        let timestamp = read_u32(&mut reader)?;
        let microtime = read_u32(&mut reader)?;

        Ok(Self {
            name_hash,
            flags,
            name_addr,
            data_addr,
            length,
            timestamp,
            microtime,
        })
    }
}

/// A named blob stored in (or destined for) an image
///
/// On encode, `name` may carry a trailing `.gz`; the encoder strips it and
/// sets the compressed bit. On decode, `name` is the stored name and
/// [`FileRecord::output_name`] gives the name to materialize on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub data: Vec<u8>,
    pub flags: FileFlags,
    pub timestamp: u32,
    pub microtime: u32,
    /// Whether the stored name hash matched the decoded name.
    /// Always `true` for records that did not come from a decoder.
    pub name_hash_ok: bool,
}

impl FileRecord {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            flags: FileFlags::empty(),
            timestamp: 0,
            microtime: 0,
            name_hash_ok: true,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_microtime(mut self, microtime: u32) -> Self {
        self.microtime = microtime;
        self
    }

    pub fn with_flags(mut self, flags: FileFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_compressed(&self) -> bool {
        self.flags.contains(FileFlags::COMPRESSED)
    }

    pub fn is_indexed(&self) -> bool {
        self.flags.contains(FileFlags::INDEXED)
    }

    /// Name to use when writing this record back out as a standalone file
    pub fn output_name(&self) -> String {
        if self.is_compressed() {
            format!("{}{}", self.name, COMPRESSED_SUFFIX)
        } else {
            self.name.clone()
        }
    }
}

// Helper functions for reading primitive types
fn read_u16<R: Read>(mut reader: R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(mut reader: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
