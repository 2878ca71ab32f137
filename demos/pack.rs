/// Pack a directory into an MPFS2 image, then list it back
///
/// Run with: cargo run --example pack -- <input-dir> <output.bin>
/// Without arguments a small built-in site is packed to `example_site.bin`.
use anyhow::{bail, Context, Result};
use mpfs_rs::{CodecConfig, ImageReader, ImageWriter};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = CodecConfig::default();

    let output = match args.as_slice() {
        [] => {
            let output = PathBuf::from("example_site.bin");
            let mut writer = ImageWriter::new(config.clone());
            writer.add_file("index.htm", b"<html><body>~inc:footer.inc~</body></html>");
            writer.add_file("index.ht#", &[0x0C, 0, 0, 0, 0x01, 0, 0, 0]);
            writer.add_file("footer.inc", b"<footer>mpfs-rs</footer>");
            writer.add_file("style.css.gz", &[0x1f, 0x8b, 0x08, 0x00]);
            let size = writer.write_to_path(&output)?;
            println!("Packed built-in site: {} bytes", size);
            output
        }
        [input, output] => {
            let output = PathBuf::from(output);
            let size = pack_dir(Path::new(input), &output, &config)?;
            println!("Packed {}: {} bytes", input, size);
            output
        }
        _ => bail!("usage: pack [<input-dir> <output.bin>]"),
    };

    list(&output, &config)
}

fn pack_dir(input: &Path, output: &Path, config: &CodecConfig) -> Result<u64> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(input)
        .with_context(|| format!("reading {}", input.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let mut writer = ImageWriter::new(config.clone());
    for path in &entries {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("non UTF-8 file name: {}", path.display()))?;
        writer.add_file_from_disk(name, path)?;
    }
    if writer.is_empty() {
        bail!("no files found in {}", input.display());
    }
    Ok(writer.write_to_path(output)?)
}

fn list(path: &Path, config: &CodecConfig) -> Result<()> {
    let reader = ImageReader::open(path, config)?;

    println!("\n{:<24} {:>8} {:>5} {:>5} {:>6}", "Name", "Size", "Gzip", "Index", "Hash");
    for info in reader.list() {
        println!(
            "{:<24} {:>8} {:>5} {:>5} {:>6}",
            info.name,
            info.size,
            if info.compressed { "yes" } else { "" },
            if info.indexed { "yes" } else { "" },
            if info.name_hash_ok { "OK" } else { "FAIL" },
        );
    }

    println!("\n{}", serde_json::to_string_pretty(&reader.list())?);
    Ok(())
}
