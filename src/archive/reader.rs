use crate::archive::format::{FatEntry, FileRecord, ImageHeader, FAT_ENTRY_SIZE, HEADER_SIZE};
use crate::archive::validate;
use crate::config::CodecConfig;
use crate::error::{FormatError, MpfsError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, trace, warn};

/// Decode an MPFS2 image into its file records, in FAT order
///
/// Fails on the first structural problem; no partial list is returned.
/// A name hash mismatch is not fatal and is reported through
/// [`FileRecord::name_hash_ok`].
pub fn decode(buf: &[u8], config: &CodecConfig) -> Result<Vec<FileRecord>> {
    let image_len = buf.len() as u64;
    validate::check_image_size(image_len, config.max_image_size)?;
    validate::check_min_len(HEADER_SIZE as u64, image_len)?;

    let header = ImageHeader::read_from(&buf[..HEADER_SIZE])?;
    validate::check_header(&header)?;
    validate::check_min_len(header.fat_end(), image_len)?;

    let mut records = Vec::with_capacity(header.file_count as usize);
    for index in 0..header.file_count as usize {
        let start = HEADER_SIZE + index * FAT_ENTRY_SIZE;
        let entry = FatEntry::read_from(&buf[start..start + FAT_ENTRY_SIZE])?;
        trace!(
            index,
            name_addr = entry.name_addr,
            data_addr = entry.data_addr,
            length = entry.length,
            "read FAT entry"
        );
        records.push(decode_entry(buf, index, &entry)?);
    }

    debug!(files = records.len(), bytes = image_len, "decoded MPFS2 image");
    Ok(records)
}

fn decode_entry(buf: &[u8], index: usize, entry: &FatEntry) -> Result<FileRecord> {
    let image_len = buf.len() as u64;

    // The name needs at least its terminator inside the image
    validate::check_range(index, "name", entry.name_addr as u64, 1, image_len)?;
    let name_start = entry.name_addr as usize;
    let name_len = buf[name_start..]
        .iter()
        .position(|&b| b == 0)
        .ok_or(FormatError::UnterminatedName {
            index,
            name_addr: entry.name_addr,
        })?;
    let name = std::str::from_utf8(&buf[name_start..name_start + name_len])
        .map_err(|e| FormatError::InvalidName {
            index,
            reason: format!("invalid UTF-8: {e}"),
        })?
        .to_string();

    let data_end = validate::check_range(
        index,
        "data",
        entry.data_addr as u64,
        entry.length as u64,
        image_len,
    )?;
    let data = buf[entry.data_addr as usize..data_end as usize].to_vec();

    let name_hash_ok = validate::name_hash_matches(&name, entry.name_hash);
    if !name_hash_ok {
        warn!(index, name = %name, stored = entry.name_hash, "name hash mismatch");
    }

    Ok(FileRecord {
        name,
        data,
        flags: entry.flags,
        timestamp: entry.timestamp,
        microtime: entry.microtime,
        name_hash_ok,
    })
}

/// Lightweight descriptor returned by [`ImageReader::list`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub flags: u16,
    pub compressed: bool,
    pub indexed: bool,
    pub timestamp: u32,
    pub microtime: u32,
    pub name_hash_ok: bool,
}

impl From<&FileRecord> for FileInfo {
    fn from(r: &FileRecord) -> Self {
        FileInfo {
            name: r.name.clone(),
            size: r.data.len() as u64,
            flags: r.flags.bits(),
            compressed: r.is_compressed(),
            indexed: r.is_indexed(),
            timestamp: r.timestamp,
            microtime: r.microtime,
            name_hash_ok: r.name_hash_ok,
        }
    }
}

/// Decoded image with name lookup
///
/// Names are not required to be unique; lookups return the first record
/// with a given name.
pub struct ImageReader {
    records: Vec<FileRecord>,
    by_name: HashMap<String, usize>,
    image_len: u64,
}

impl ImageReader {
    /// Decode an image held in memory
    pub fn from_bytes(buf: &[u8], config: &CodecConfig) -> Result<Self> {
        let records = decode(buf, config)?;

        let mut by_name = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            by_name.entry(record.name.clone()).or_insert(i);
        }

        Ok(Self {
            records,
            by_name,
            image_len: buf.len() as u64,
        })
    }

    /// Read and decode an image file
    ///
    /// The size ceiling is checked against the file's metadata before the
    /// file is read into memory.
    pub fn open<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        validate::check_image_size(fs::metadata(path)?.len(), config.max_image_size)?;
        let buf = fs::read(path)?;
        Self::from_bytes(&buf, config)
    }

    /// Size of the decoded image in bytes
    pub fn image_len(&self) -> u64 {
        self.image_len
    }

    pub fn entry_count(&self) -> usize {
        self.records.len()
    }

    /// All records in FAT order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }

    /// Stored names in FAT order
    pub fn list_files(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn list(&self) -> Vec<FileInfo> {
        self.records.iter().map(FileInfo::from).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get_record(&self, name: &str) -> Option<&FileRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    /// Data of the named file, exactly as stored
    pub fn read_file(&self, name: &str) -> Result<&[u8]> {
        self.get_record(name)
            .map(|r| r.data.as_slice())
            .ok_or_else(|| MpfsError::FileNotFound(name.to_string()))
    }

    /// Records whose stored name hash did not match
    pub fn hash_failures(&self) -> Vec<&FileRecord> {
        self.records.iter().filter(|r| !r.name_hash_ok).collect()
    }

    /// Write every record under `dest` using its output name
    ///
    /// Names that are absolute or contain `..` are rejected before anything
    /// is written. Returns the number of files written.
    pub fn extract_all<P: AsRef<Path>>(&self, dest: P) -> Result<usize> {
        let dest = dest.as_ref();

        let mut targets = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let output_name = record.output_name();
            let relative = Path::new(&output_name);
            let safe = !output_name.is_empty()
                && relative
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !safe {
                return Err(MpfsError::PathError(format!(
                    "Refusing to extract unsafe name: {:?}",
                    output_name
                )));
            }
            targets.push((dest.join(relative), record));
        }

        fs::create_dir_all(dest)?;
        for (target, record) in &targets {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, &record.data)?;
            debug!(path = %target.display(), bytes = record.data.len(), "extracted file");
        }

        Ok(targets.len())
    }
}
