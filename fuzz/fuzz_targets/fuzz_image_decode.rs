#![no_main]

use libfuzzer_sys::fuzz_target;
use mpfs_rs::{decode, encode, CodecConfig, ImageReader};

fuzz_target!(|data: &[u8]| {
    let config = CodecConfig::default();

    // Decode must never panic, whatever the input
    let records = match decode(data, &config) {
        Ok(records) => records,
        Err(_) => return, // Expected for invalid data
    };

    // Anything that decodes must re-encode; stored names carry no suffix
    // and compressed bits come back from the flags
    if let Ok(image) = encode(&records, u64::MAX) {
        let _ = decode(&image, &config);
    }

    // Lookups over whatever names were recovered - should never panic
    if let Ok(reader) = ImageReader::from_bytes(data, &config) {
        for name in reader.list_files() {
            let _ = reader.read_file(name);
        }
        let _ = reader.contains("");
        let _ = reader.contains("index.htm");
        let _ = reader.hash_failures();
    }
});
