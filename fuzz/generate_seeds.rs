//! Generate seed corpus for fuzzing

use mpfs_rs::{encode, FileRecord};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let corpus_dir = "fuzz/corpus/fuzz_image_decode";
    fs::create_dir_all(corpus_dir)?;

    println!("Generating seed corpus...");

    let seeds: Vec<(&str, Vec<FileRecord>)> = vec![
        // Header only
        ("seed_empty.bin", Vec::new()),
        (
            "seed_single_small.bin",
            vec![FileRecord::new("test.txt", b"Hello, World!".to_vec())],
        ),
        (
            "seed_indexed.bin",
            vec![
                FileRecord::new("index.htm", b"<html>~inc:header.inc~</html>".to_vec()),
                FileRecord::new("index.ht#", vec![6, 0, 0, 0, 1, 0, 0, 0]),
                FileRecord::new("header.inc", b"<h1>hi</h1>".to_vec()),
            ],
        ),
        (
            "seed_compressed.bin",
            vec![FileRecord::new("style.css.gz", vec![0x1f, 0x8b, 0x08, 0x00])],
        ),
        (
            "seed_binary.bin",
            vec![FileRecord::new("binary.bin", (0..=255).collect::<Vec<u8>>())],
        ),
        (
            "seed_zero_length.bin",
            vec![FileRecord::new("empty.txt", Vec::new())],
        ),
    ];

    for (file_name, records) in &seeds {
        let path = format!("{}/{}", corpus_dir, file_name);
        fs::write(&path, encode(records, u64::MAX)?)?;
        println!("✓ Generated: {}", path);
    }

    println!("\nGenerated {} seed files in {}", seeds.len(), corpus_dir);
    Ok(())
}
