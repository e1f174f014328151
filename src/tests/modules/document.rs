use std::collections::HashSet;

use crate::{
    Binary,
    Bson,
    DateTime,
    Document,
    Timestamp,
    doc,
    oid::ObjectId,
    raw::MAX_NESTING_DEPTH,
    spec::BinarySubtype,
};
use pretty_assertions::assert_eq;

#[test]
fn ordered_insert() {
    let mut doc = Document::new();
    doc.insert("first".to_owned(), Bson::Int32(1));
    doc.insert("second".to_owned(), Bson::String("foo".to_owned()));
    doc.insert("alphanumeric".to_owned(), Bson::String("bar".to_owned()));

    let keys: Vec<_> = doc.iter().map(|(key, _)| key.to_owned()).collect();
    assert_eq!(keys, vec!["first", "second", "alphanumeric"]);
    assert_eq!(doc.len(), 3);
}

#[test]
fn overwrite_keeps_position() {
    let mut doc = doc! { "a": 1, "b": "two", "c": 3 };
    let previous = doc.insert("b", 2);
    assert_eq!(previous, Some(Bson::String("two".into())));
    assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(doc.get("b"), Some(Bson::Int32(2)));
    assert_eq!(doc.len(), 3);

    // null is a value, not a removal
    doc.insert("c", Bson::Null);
    assert!(doc.contains_key("c"));
    assert!(doc.is_null("c"));
    assert_eq!(doc.len(), 3);
}

#[test]
fn getters() {
    let datetime = DateTime::now();
    let binary = vec![0, 1, 2, 3, 4];
    let oid = ObjectId::new();
    let doc = doc! {
        "floating_point": 10.0,
        "string": "a value",
        "array": [10, 20, 30],
        "doc": { "key": 1 },
        "bool": true,
        "i32": 1i32,
        "i64": 1i64,
        "datetime": datetime,
        "binary": Binary::generic(binary.clone()),
        "md5": Binary::new(BinarySubtype::Md5, vec![7; 16]).unwrap(),
        "timestamp": Timestamp { time: 100, increment: 1000 },
        "_id": oid,
        "null": null,
    };

    assert_eq!(doc.get("nonsense"), None);
    assert!(
        doc.get_str("nonsense")
            .unwrap_err()
            .is_value_access_not_present()
    );
    assert!(
        doc.get_str("floating_point")
            .unwrap_err()
            .is_value_access_unexpected_type()
    );

    assert_eq!(doc.get("floating_point"), Some(Bson::Double(10.0)));
    assert_eq!(doc.get_f64("floating_point").unwrap(), 10.0);
    assert_eq!(doc.get_str("string").unwrap(), "a value");
    assert_eq!(
        doc.get_array("array").unwrap(),
        vec![Bson::Int32(10), Bson::Int32(20), Bson::Int32(30)]
    );
    assert_eq!(doc.get_document("doc").unwrap(), doc! { "key": 1 });
    assert!(doc.get_bool("bool").unwrap());
    assert_eq!(doc.get_i32("i32").unwrap(), 1);
    assert_eq!(doc.get_i64("i64").unwrap(), 1);
    // typed getters do not widen
    assert!(
        doc.get_i64("i32")
            .unwrap_err()
            .is_value_access_unexpected_type()
    );
    assert_eq!(doc.get_datetime("datetime").unwrap(), datetime);
    assert_eq!(doc.get_binary_generic("binary").unwrap(), binary.as_slice());
    assert!(doc.get_binary_generic("md5").is_err());
    assert_eq!(doc.get_binary("md5").unwrap().subtype(), BinarySubtype::Md5);
    assert_eq!(
        doc.get_timestamp("timestamp").unwrap(),
        Timestamp {
            time: 100,
            increment: 1000
        }
    );
    assert_eq!(doc.get_object_id("_id").unwrap(), oid);
    assert!(doc.is_null("null"));
    assert!(!doc.is_null("string"));
}

#[test]
fn clone_is_a_snapshot() {
    let mut doc = doc! { "name": "before", "n": 1 };
    let snapshot = doc.clone();
    assert_eq!(doc.as_bytes().as_ptr(), snapshot.as_bytes().as_ptr());

    doc.insert("name", "after");
    doc.insert("n", 2);
    doc.insert("extra", true);

    assert_eq!(snapshot, doc! { "name": "before", "n": 1 });
    assert_eq!(doc, doc! { "name": "after", "n": 2, "extra": true });
    assert_ne!(doc.as_bytes().as_ptr(), snapshot.as_bytes().as_ptr());
}

#[test]
fn same_width_replacement_patches_in_place() {
    let mut doc = doc! { "a": 1, "f": 2.5, "t": Timestamp { time: 1, increment: 1 } };
    let before = doc.as_bytes().as_ptr();
    let size = doc.as_bytes().len();

    doc.insert("a", 42);
    doc.insert("f", -0.5);
    doc.insert(
        "t",
        Timestamp {
            time: 2,
            increment: 3,
        },
    );

    assert_eq!(doc.as_bytes().as_ptr(), before);
    assert_eq!(doc.as_bytes().len(), size);
    assert_eq!(doc.get_i32("a").unwrap(), 42);
    assert_eq!(doc.get_f64("f").unwrap(), -0.5);

    // a width change re-encodes the element and updates the length prefix
    doc.insert("a", 42_i64);
    assert_eq!(doc.as_bytes().len(), size + 4);
    assert_eq!(
        i32::from_le_bytes(doc.as_bytes()[..4].try_into().unwrap()) as usize,
        size + 4
    );
    assert_eq!(doc.get_i64("a").unwrap(), 42);
    assert_eq!(Document::from_bytes(doc.to_vec()).unwrap(), doc);
}

#[test]
fn remove_retain_clear() {
    let mut doc = doc! { "a": 1, "b": 2, "c": 3, "d": 4 };

    assert_eq!(doc.remove("b"), Some(Bson::Int32(2)));
    assert_eq!(doc.remove("b"), None);
    assert_eq!(doc, doc! { "a": 1, "c": 3, "d": 4 });
    assert_eq!(doc.len(), 3);

    doc.retain(|key, value| key != "a" && value.as_i32() != Some(4));
    assert_eq!(doc, doc! { "c": 3 });
    assert_eq!(doc.len(), 1);

    doc.clear();
    assert!(doc.is_empty());
    assert_eq!(doc.as_bytes(), &[5, 0, 0, 0, 0]);
}

#[test]
fn merge() {
    let mut target = doc! { "a": 1, "b": 2 };
    target.merge(&doc! { "b": 3, "c": 4 }).unwrap();
    assert_eq!(target, doc! { "a": 1, "b": 3, "c": 4 });
    assert_eq!(target.keys().collect::<Vec<_>>(), ["a", "b", "c"]);

    let mut empty = Document::new();
    empty.merge(&target).unwrap();
    assert_eq!(empty, target);
}

#[test]
fn positional_access() {
    let doc = doc! { "a": 1, "b": 2, "c": 3 };
    assert_eq!(doc.first(), Some(("a", Bson::Int32(1))));
    assert_eq!(doc.last(), Some(("c", Bson::Int32(3))));
    assert_eq!(doc.get_index(1), Some(("b", Bson::Int32(2))));
    assert_eq!(doc.get_index(3), None);
    assert_eq!(Document::new().last(), None);

    assert_eq!(doc.prefix(2), doc! { "a": 1, "b": 2 });
    assert_eq!(doc.suffix(1), doc! { "c": 3 });
    assert_eq!(doc.suffix(10), doc);
    assert_eq!(doc.slice(1..2), doc! { "b": 2 });
    assert_eq!(doc.slice(5..), Document::new());
    assert_eq!(doc.slice(2..1), Document::new());
    assert_eq!(doc.prefix(2).len(), 2);
}

#[test]
fn duplicate_keys_from_bytes() {
    // { "a": 1, "a": 2 }
    let bytes = vec![
        0x13, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0x10, b'a', 0, 2, 0, 0, 0, 0,
    ];
    let mut doc = Document::from_bytes(bytes.clone()).unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.get_i32("a").unwrap(), 1);
    assert_eq!(doc.as_bytes(), bytes.as_slice());

    let values: Vec<_> = doc.values().collect();
    assert_eq!(values, vec![Bson::Int32(1), Bson::Int32(2)]);

    doc.merge(&Document::new()).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get_i32("a").unwrap(), 1);
}

#[test]
fn equality_across_numeric_widths() {
    let narrow = doc! { "n": 1, "sub": { "x": 2.0 } };
    let wide = doc! { "n": 1_i64, "sub": { "x": 2_i64 } };
    assert_ne!(narrow.as_bytes(), wide.as_bytes());
    assert_eq!(narrow, wide);

    // order matters
    assert_ne!(doc! { "a": 1, "b": 2 }, doc! { "b": 2, "a": 1 });

    let set: HashSet<Document> = [narrow, wide, doc! { "n": 2 }].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn display_and_debug() {
    assert_eq!(Document::new().to_string(), "{}");
    assert_eq!(
        doc! { "a": 1, "b": [true, null] }.to_string(),
        "{ \"a\": 1, \"b\": [true, null] }"
    );
    assert_eq!(
        format!("{:?}", doc! { "a": 1 }),
        "Document({\"a\": Int32(1)})"
    );
}

#[test]
fn collect_and_extend() {
    let mut doc: Document = vec![("a", 1), ("b", 2)].into_iter().collect();
    doc.extend([("c", 3), ("a", 10)]);
    assert_eq!(doc, doc! { "a": 10, "b": 2, "c": 3 });

    let pairs: Vec<(String, Bson)> = doc
        .into_iter()
        .collect();
    assert_eq!(pairs[0], ("a".to_owned(), Bson::Int32(10)));
}

#[test]
fn reader_and_writer() {
    let doc = doc! { "hello": "world", "nested": { "n": 1 } };
    let mut out = Vec::new();
    doc.to_writer(&mut out).unwrap();
    assert_eq!(out, doc.to_vec());

    let read = Document::from_reader(out.as_slice()).unwrap();
    assert_eq!(read, doc);

    let truncated = &out[..out.len() - 3];
    assert!(Document::from_reader(truncated).is_err());
}

#[test]
fn from_bytes_rejects_malformed_input() {
    // declared length larger than the buffer
    let err = Document::from_bytes(vec![0x0d, 0, 0, 0, 0x10, b'i', 0, 1, 0, 0, 0, 0]).unwrap_err();
    assert!(err.is_malformed_bytes());

    // missing terminator
    let err = Document::from_bytes(vec![0x0c, 0, 0, 0, 0x10, b'i', 0, 1, 0, 0, 0, 1]).unwrap_err();
    assert!(err.is_malformed_bytes());

    // shorter than the smallest document
    assert!(Document::from_bytes(vec![4, 0, 0, 0]).is_err());

    // unknown element type
    let err = Document::from_bytes(vec![0x08, 0, 0, 0, 0x42, b'a', 0, 0]).unwrap_err();
    assert!(err.is_malformed_bytes());
}

#[test]
#[should_panic]
fn insert_panics_on_null_byte_key() {
    let mut doc = Document::new();
    doc.insert("a\0b", 1);
}

#[test]
fn try_insert_reports_null_byte_key() {
    let mut doc = doc! { "a": 1 };
    assert!(doc.try_insert("a\0b", 1).is_err());
    assert_eq!(doc, doc! { "a": 1 });
}

fn nested(depth: usize) -> Document {
    let mut doc = Document::new();
    for _ in 0..depth {
        let mut outer = Document::new();
        outer.insert("d", doc);
        doc = outer;
    }
    doc
}

#[test]
fn insert_and_decode_agree_on_nesting_limit() {
    let deepest = nested(MAX_NESTING_DEPTH);
    assert_eq!(Document::from_bytes(deepest.to_vec()).unwrap(), deepest);

    let mut outer = Document::new();
    let err = outer.try_insert("d", deepest.clone()).unwrap_err();
    assert!(err.is_invalid_value());
    assert!(outer.is_empty());

    // the same document one level deeper, encoded by hand
    let mut bytes = vec![0u8; 4];
    bytes.extend_from_slice(&[0x03, b'd', 0]);
    bytes.extend_from_slice(deepest.as_bytes());
    bytes.push(0);
    let len = bytes.len() as i32;
    bytes[..4].copy_from_slice(&len.to_le_bytes());
    assert!(Document::from_bytes(bytes).unwrap_err().is_malformed_bytes());
}

#[test]
fn nested_arrays_count_toward_nesting_limit() {
    let mut array = Bson::Array(Vec::new());
    for _ in 1..MAX_NESTING_DEPTH {
        array = Bson::Array(vec![array]);
    }
    let mut doc = Document::new();
    doc.try_insert("a", array.clone()).unwrap();
    assert_eq!(Document::from_bytes(doc.to_vec()).unwrap(), doc);

    let err = Document::new()
        .try_insert("a", Bson::Array(vec![array]))
        .unwrap_err();
    assert!(err.is_invalid_value());
}

#[test]
#[should_panic]
fn insert_panics_past_nesting_limit() {
    let mut outer = Document::new();
    outer.insert("d", nested(MAX_NESTING_DEPTH));
}
