#![no_main]
use bson_core::raw::RawDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|buf: &[u8]| {
    if let Ok(doc) = RawDocument::from_bytes(buf) {
        for element in doc.iter().flatten() {
            let _ = element.value().to_bson();
        }
        let _ = doc.validate();
    }
});
