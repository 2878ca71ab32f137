//! Integration tests for mpfs-rs

use mpfs_rs::{
    decode, encode, CodecConfig, FileFlags, FileInfo, FileRecord, ImageReader, ImageWriter,
    MpfsError,
};
use std::fs;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_index_pair_scenario() {
    let records = vec![
        FileRecord::new("index.htm", b"<html/>".to_vec()),
        FileRecord::new("index.ht#", b"\x00\x01".to_vec()),
    ];

    let image = encode(&records, 1024).unwrap();

    // Header
    assert_eq!(&image[0..4], b"MPFS");
    assert_eq!(u16::from_le_bytes([image[4], image[5]]), 2);
    assert_eq!(u16::from_le_bytes([image[6], image[7]]), 2);

    let decoded = decode(&image, &CodecConfig::default()).unwrap();
    assert_eq!(decoded.len(), 2);

    assert_eq!(decoded[0].name, "index.htm");
    assert_eq!(decoded[0].data, b"<html/>");
    assert!(decoded[0].flags.contains(FileFlags::INDEXED));
    assert!(decoded[0].name_hash_ok);

    assert_eq!(decoded[1].name, "index.ht#");
    assert_eq!(decoded[1].data, b"\x00\x01");
    assert_eq!(decoded[1].flags, FileFlags::empty());
    assert!(decoded[1].name_hash_ok);
}

#[test]
fn test_basic_roundtrip() {
    let records = vec![
        FileRecord::new("index.htm", b"<html><body>hi</body></html>".to_vec())
            .with_timestamp(1_700_000_000)
            .with_microtime(0xCAFEBABE),
        FileRecord::new("img/logo.png", vec![0x89, b'P', b'N', b'G'])
            .with_timestamp(1_600_000_000),
        FileRecord::new("empty.txt", Vec::new()),
    ];

    let image = encode(&records, 4096).unwrap();
    let decoded = decode(&image, &CodecConfig::default()).unwrap();

    assert_eq!(decoded, records);
}

#[test]
fn test_decode_then_encode_is_stable() {
    let records = vec![
        FileRecord::new("page.htm.gz", b"\x1f\x8b".to_vec()).with_timestamp(5),
        FileRecord::new("page.ht#", b"idx".to_vec()).with_timestamp(6),
        FileRecord::new("plain.js", b"let x;".to_vec()).with_timestamp(7),
    ];

    let first = encode(&records, 4096).unwrap();
    let decoded = decode(&first, &CodecConfig::default()).unwrap();

    assert_eq!(decoded[0].name, "page.htm");
    assert_eq!(
        decoded[0].flags,
        FileFlags::COMPRESSED | FileFlags::INDEXED
    );
    assert_eq!(decoded[0].output_name(), "page.htm.gz");

    // Stored names no longer carry the suffix; the compressed bit carries it
    let second = encode(&decoded, 4096).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compressed_record_materializes_with_suffix() {
    let image = encode(&[FileRecord::new("c.css.gz", b"gzdata".to_vec())], 1024).unwrap();
    let decoded = decode(&image, &CodecConfig::default()).unwrap();

    assert_eq!(decoded[0].name, "c.css");
    assert!(decoded[0].is_compressed());
    assert_eq!(decoded[0].output_name(), "c.css.gz");
}

#[test]
fn test_duplicate_names_are_allowed() {
    let records = vec![
        FileRecord::new("dup.txt", b"first".to_vec()),
        FileRecord::new("dup.txt", b"second".to_vec()),
    ];
    let image = encode(&records, 1024).unwrap();

    let reader = ImageReader::from_bytes(&image, &CodecConfig::default()).unwrap();
    assert_eq!(reader.entry_count(), 2);
    assert_eq!(reader.read_file("dup.txt").unwrap(), b"first");
    assert_eq!(reader.list_files(), vec!["dup.txt", "dup.txt"]);
}

#[test]
fn test_writer_to_disk_and_reader_open() {
    let temp_file = NamedTempFile::new().unwrap();
    let image_path = temp_file.path();

    // Create image
    {
        let mut writer = ImageWriter::new(CodecConfig::default());
        writer.add_file("test.txt", b"Hello, World!");
        writer.add_file_with_timestamp("data/nested.txt", b"Nested content", 42);
        let size = writer.write_to_path(image_path).unwrap();
        assert_eq!(size, fs::metadata(image_path).unwrap().len());
    }

    // Read image
    {
        let reader = ImageReader::open(image_path, &CodecConfig::default()).unwrap();
        assert_eq!(reader.entry_count(), 2);
        assert!(reader.contains("test.txt"));
        assert!(reader.contains("data/nested.txt"));
        assert_eq!(reader.read_file("test.txt").unwrap(), b"Hello, World!");
        assert_eq!(reader.get_record("data/nested.txt").unwrap().timestamp, 42);
        assert!(reader.get_record("test.txt").unwrap().timestamp > 0);
    }
}

#[test]
fn test_add_file_from_disk_uses_mtime() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.htm");
    fs::write(&source, b"<p>disk</p>").unwrap();

    let mut writer = ImageWriter::new(CodecConfig::default());
    writer.add_file_from_disk("source.htm", &source).unwrap();
    let image = writer.finalize().unwrap();

    let decoded = decode(&image, &CodecConfig::default()).unwrap();
    assert_eq!(decoded[0].data, b"<p>disk</p>");
    assert!(decoded[0].timestamp > 0);
}

#[test]
fn test_forced_timestamp_applies_to_every_file() {
    let config = CodecConfig::default().with_force_timestamp(1_234_567);
    let mut writer = ImageWriter::new(config.clone());
    writer.add_file("a", b"1");
    writer.add_file_with_timestamp("b", b"2", 99);

    let image = writer.finalize().unwrap();
    for record in decode(&image, &config).unwrap() {
        assert_eq!(record.timestamp, 1_234_567);
    }
}

#[test]
fn test_reader_open_checks_size_before_reading() {
    let temp_file = NamedTempFile::new().unwrap();
    let image = encode(&[FileRecord::new("a", vec![0u8; 100])], 1024).unwrap();
    fs::write(temp_file.path(), &image).unwrap();

    let config = CodecConfig::default().with_max_image_size(64);
    let err = ImageReader::open(temp_file.path(), &config).err().unwrap();
    assert!(matches!(err, MpfsError::Capacity(_)));
}

#[test]
fn test_extract_all() {
    let records = vec![
        FileRecord::new("index.htm", b"<html/>".to_vec()),
        FileRecord::new("css/site.css.gz", b"\x1f\x8b".to_vec()),
    ];
    let image = encode(&records, 1024).unwrap();
    let reader = ImageReader::from_bytes(&image, &CodecConfig::default()).unwrap();

    let dir = tempdir().unwrap();
    let written = reader.extract_all(dir.path()).unwrap();
    assert_eq!(written, 2);

    assert_eq!(fs::read(dir.path().join("index.htm")).unwrap(), b"<html/>");
    assert_eq!(
        fs::read(dir.path().join("css/site.css.gz")).unwrap(),
        b"\x1f\x8b"
    );
}

#[test]
fn test_extract_all_rejects_traversal() {
    let records = vec![
        FileRecord::new("ok.txt", b"fine".to_vec()),
        FileRecord::new("../escape.txt", b"bad".to_vec()),
    ];
    let image = encode(&records, 1024).unwrap();
    let reader = ImageReader::from_bytes(&image, &CodecConfig::default()).unwrap();

    let dir = tempdir().unwrap();
    let dest = dir.path().join("out");
    let err = reader.extract_all(&dest).unwrap_err();
    assert!(matches!(err, MpfsError::PathError(_)));

    // Nothing is written when any name is unsafe
    assert!(!dest.join("ok.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
}

#[test]
fn test_listing_serializes() {
    let image = encode(
        &[
            FileRecord::new("a.htm", b"x".to_vec()).with_timestamp(10),
            FileRecord::new("a.ht#", b"y".to_vec()),
        ],
        1024,
    )
    .unwrap();
    let reader = ImageReader::from_bytes(&image, &CodecConfig::default()).unwrap();

    let listing: Vec<FileInfo> = reader.list();
    let json = serde_json::to_value(&listing).unwrap();

    assert_eq!(json[0]["name"], "a.htm");
    assert_eq!(json[0]["size"], 1);
    assert_eq!(json[0]["indexed"], true);
    assert_eq!(json[0]["flags"], 2);
    assert_eq!(json[0]["timestamp"], 10);
    assert_eq!(json[1]["indexed"], false);
    assert_eq!(json[1]["name_hash_ok"], true);
}

#[test]
fn test_config_file() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(
        temp_file.path(),
        "max_image_size = 40\nforce_timestamp = 77\n",
    )
    .unwrap();

    let config = CodecConfig::load(temp_file.path()).unwrap();
    assert_eq!(config.max_image_size, 40);
    assert_eq!(config.force_timestamp, Some(77));

    // 8 + 24 + 2 + 10 = 44 > 40
    let mut writer = ImageWriter::new(config);
    writer.add_file("a", &[0u8; 10]);
    assert!(matches!(writer.finalize(), Err(MpfsError::Capacity(_))));
}
