#![no_main]
use bson_core::Document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &[u8]| {
    if let Ok(doc) = Document::from_bytes(input) {
        // a validated buffer is kept as is
        assert_eq!(doc.as_bytes(), input);
        assert_eq!(doc.values().count(), doc.len());
        let _ = doc.to_canonical_extjson_string();
    }
});
