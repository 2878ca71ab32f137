use bitflags::bitflags;
use std::collections::HashSet;

/// Suffix marking a pre-compressed input file
pub const COMPRESSED_SUFFIX: &str = ".gz";

/// Final character of an index companion file's name
pub const INDEX_MARKER: char = '#';

bitflags! {
    /// FAT entry flag bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileFlags: u16 {
        /// Payload is gzip data; the server must send a matching encoding header.
        const COMPRESSED = 0b01;
        /// A companion index file (last character replaced by `#`) exists.
        const INDEXED = 0b10;
    }
}

/// Split a trailing `.gz` off a raw input name
///
/// Returns the name to store and whether the suffix was present.
pub fn strip_compressed_suffix(raw: &str) -> (&str, bool) {
    match raw.strip_suffix(COMPRESSED_SUFFIX) {
        Some(stored) => (stored, true),
        None => (raw, false),
    }
}

/// Name of the index file that would accompany `name`
///
/// `None` for an empty name and for names that are themselves index files.
pub fn index_companion_name(name: &str) -> Option<String> {
    let last = name.chars().next_back()?;
    if last == INDEX_MARKER {
        return None;
    }

    let mut companion = String::with_capacity(name.len());
    companion.push_str(&name[..name.len() - last.len_utf8()]);
    companion.push(INDEX_MARKER);
    Some(companion)
}

/// Derive the flag bits for one file
///
/// `names` holds every stored (suffix-stripped) name in the image; `raw_name`
/// is this file's input name, possibly still ending in `.gz`. Collisions where
/// two names share one companion are not detected.
pub fn derive_flags(names: &HashSet<&str>, raw_name: &str) -> FileFlags {
    let (stored, compressed) = strip_compressed_suffix(raw_name);

    let mut flags = indexed_flag(names, stored);
    if compressed {
        flags |= FileFlags::COMPRESSED;
    }
    flags
}

/// The indexed bit for an already-stored name, or no bits
pub fn indexed_flag(names: &HashSet<&str>, stored_name: &str) -> FileFlags {
    match index_companion_name(stored_name) {
        Some(companion) if names.contains(companion.as_str()) => FileFlags::INDEXED,
        _ => FileFlags::empty(),
    }
}
