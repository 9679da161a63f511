#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    if let Ok(tree) = szamla::xml::XmlDecoder::default().decode_bytes(data) {
        let _ = tree.to_json();
    }
});
