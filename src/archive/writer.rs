use crate::archive::flags::{indexed_flag, strip_compressed_suffix, FileFlags};
use crate::archive::format::{FatEntry, FileRecord, ImageHeader, FAT_ENTRY_SIZE, HEADER_SIZE};
use crate::archive::hash::name_hash;
use crate::archive::validate;
use crate::config::CodecConfig;
use crate::error::{FormatError, MpfsError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Encode records into an MPFS2 image
///
/// Layout: header, FAT, every name (null-terminated) in input order, then
/// every payload in input order. Names ending in `.gz` are stored without
/// the suffix and get the compressed bit, unless the record already has
/// that bit, in which case its name is stored as is. The indexed bit is
/// always derived from the full name set; any other bits already on a
/// record are kept.
///
/// Names containing a NUL byte are rejected, since the name table is
/// null-terminated. An empty record list yields a header-only image.
pub fn encode(records: &[FileRecord], size_limit: u64) -> Result<Vec<u8>> {
    encode_records(records, size_limit, None)
}

/// Encode using the configured size ceiling and forced timestamp
pub fn encode_with(records: &[FileRecord], config: &CodecConfig) -> Result<Vec<u8>> {
    encode_records(records, config.max_image_size, config.force_timestamp)
}

fn encode_records(
    records: &[FileRecord],
    size_limit: u64,
    force_timestamp: Option<u32>,
) -> Result<Vec<u8>> {
    let file_count =
        u16::try_from(records.len()).map_err(|_| FormatError::TooManyFiles(records.len()))?;

    let mut stored_names = Vec::with_capacity(records.len());
    let mut suffix_stripped = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let (stored, stripped) = stored_name(record);
        if stored.contains('\0') {
            return Err(FormatError::InvalidName {
                index,
                reason: "name contains a NUL byte".to_string(),
            }
            .into());
        }
        stored_names.push(stored);
        suffix_stripped.push(stripped);
    }
    let name_set: HashSet<&str> = stored_names.iter().copied().collect();

    let header = ImageHeader::new(file_count);
    let names_size: u64 = stored_names.iter().map(|n| n.len() as u64 + 1).sum();
    let data_size: u64 = records.iter().map(|r| r.data.len() as u64).sum();
    let total = header.fat_end() + names_size + data_size;
    validate::check_image_size(total, size_limit)?;

    // Header and FAT are filled in once every address is known
    let mut buf = vec![0u8; header.fat_end() as usize];
    buf.reserve((names_size + data_size) as usize);

    let mut name_addrs = Vec::with_capacity(records.len());
    for name in &stored_names {
        name_addrs.push(validate::to_fat_field(buf.len() as u64)?);
        buf.extend_from_slice(name.as_bytes());
        buf.push(0);
    }

    let mut data_addrs = Vec::with_capacity(records.len());
    for record in records {
        data_addrs.push(validate::to_fat_field(buf.len() as u64)?);
        buf.extend_from_slice(&record.data);
    }

    header.write_to(&mut buf[..HEADER_SIZE])?;

    for (index, record) in records.iter().enumerate() {
        let mut flags = record.flags.difference(FileFlags::INDEXED)
            | indexed_flag(&name_set, stored_names[index]);
        if suffix_stripped[index] {
            flags |= FileFlags::COMPRESSED;
        }

        let entry = FatEntry {
            name_hash: name_hash(stored_names[index]),
            flags,
            name_addr: name_addrs[index],
            data_addr: data_addrs[index],
            length: validate::to_fat_field(record.data.len() as u64)?,
            timestamp: force_timestamp.unwrap_or(record.timestamp),
            microtime: record.microtime,
        };
        trace!(index, name = stored_names[index], flags = flags.bits(), "wrote FAT entry");

        let start = HEADER_SIZE + index * FAT_ENTRY_SIZE;
        entry.write_to(&mut buf[start..start + FAT_ENTRY_SIZE])?;
    }

    debug!(files = records.len(), bytes = buf.len(), "encoded MPFS2 image");
    Ok(buf)
}

/// Name as it goes into the name table, and whether `.gz` was stripped
///
/// A record already marked compressed came from a decoder (or a caller that
/// stripped the suffix itself), so its name is final.
fn stored_name(record: &FileRecord) -> (&str, bool) {
    if record.is_compressed() {
        (&record.name, false)
    } else {
        strip_compressed_suffix(&record.name)
    }
}

/// Seconds since the Unix epoch, clamped into a 32-bit FAT field
fn unix_seconds(time: SystemTime) -> u32 {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Image builder that collects files and encodes them in insertion order
pub struct ImageWriter {
    config: CodecConfig,
    records: Vec<FileRecord>,
}

impl ImageWriter {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
        }
    }

    /// Add a file stamped with the current time
    pub fn add_file(&mut self, name: &str, data: &[u8]) {
        self.add_file_with_timestamp(name, data, unix_seconds(SystemTime::now()));
    }

    pub fn add_file_with_timestamp(&mut self, name: &str, data: &[u8], timestamp: u32) {
        self.add_record(FileRecord::new(name, data).with_timestamp(timestamp));
    }

    pub fn add_record(&mut self, record: FileRecord) {
        self.records.push(record);
    }

    /// Add a file from disk, stamped with its modification time
    pub fn add_file_from_disk(&mut self, name: &str, disk_path: &Path) -> Result<()> {
        let data = fs::read(disk_path)?;
        let modified = fs::metadata(disk_path)?.modified()?;
        self.add_file_with_timestamp(name, &data, unix_seconds(modified));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encode all added files into one image
    pub fn finalize(self) -> Result<Vec<u8>> {
        if self.records.is_empty() {
            return Err(MpfsError::EmptyImage);
        }
        encode_with(&self.records, &self.config)
    }

    /// Encode and write the image to `path`, returning its size in bytes
    pub fn write_to_path<P: AsRef<Path>>(self, path: P) -> Result<u64> {
        let image = self.finalize()?;
        fs::write(path, &image)?;
        Ok(image.len() as u64)
    }
}
