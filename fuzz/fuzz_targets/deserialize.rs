#![no_main]
use bson_core::{Document, deserialize_from_slice, serialize_to_vec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|buf: &[u8]| {
    if let Ok(doc) = deserialize_from_slice::<Document>(buf) {
        let _ = serialize_to_vec(&doc);
    }
});
