use std::collections::HashSet;

use crate::{
    Binary,
    Bson,
    DateTime,
    Decimal128,
    Document,
    JavaScriptCodeWithScope,
    Regex,
    Timestamp,
    bson,
    doc,
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[test]
fn to_json() {
    let mut doc = Document::new();
    doc.insert(
        "_id",
        Bson::ObjectId(ObjectId::from_bytes(*b"abcdefghijkl")),
    );
    doc.insert("first", Bson::Int32(1));
    doc.insert("second", Bson::String("foo".to_owned()));
    doc.insert("alphanumeric", Bson::String("bar".to_owned()));
    let data: Value = Bson::Document(doc).into();

    assert!(data.is_object());
    let obj = data.as_object().unwrap();

    let id = obj.get("_id").unwrap();
    assert!(id.is_object());
    let id_val = id.get("$oid").unwrap();
    assert!(id_val.is_string());
    assert_eq!(id_val, "6162636465666768696a6b6c");

    let first = obj.get("first").unwrap();
    assert!(first.is_number());
    assert_eq!(first.as_i64().unwrap(), 1);

    let second = obj.get("second").unwrap();
    assert!(second.is_string());
    assert_eq!(second.as_str().unwrap(), "foo");

    let alphanumeric = obj.get("alphanumeric").unwrap();
    assert!(alphanumeric.is_string());
    assert_eq!(alphanumeric.as_str().unwrap(), "bar");
}

#[test]
fn bson_default() {
    let bson1 = Bson::default();
    assert_eq!(bson1, Bson::Null);
}

#[test]
fn document_default() {
    let doc1 = Document::default();
    assert_eq!(doc1.keys().count(), 0);
    assert_eq!(doc1, Document::new());
}

#[test]
fn from_impls() {
    assert_eq!(Bson::from(1.5f32), Bson::Double(1.5));
    assert_eq!(Bson::from(2.25f64), Bson::Double(2.25));
    assert_eq!(Bson::from("data"), Bson::String(String::from("data")));
    assert_eq!(
        Bson::from(String::from("data")),
        Bson::String(String::from("data"))
    );
    assert_eq!(Bson::from(doc! {}), Bson::Document(Document::new()));
    assert_eq!(Bson::from(false), Bson::Boolean(false));
    assert_eq!(
        Bson::from(Regex::new("\\s+$", "i")),
        Bson::RegularExpression(Regex {
            pattern: String::from("\\s+$"),
            options: String::from("i"),
        })
    );
    assert_eq!(
        Bson::from(JavaScriptCodeWithScope {
            code: String::from("alert(\"hi\");"),
            scope: doc! {},
        }),
        Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
            code: String::from("alert(\"hi\");"),
            scope: doc! {},
        })
    );
    assert_eq!(
        Bson::from(Binary::new(BinarySubtype::Md5, vec![1, 2, 3]).unwrap()),
        Bson::Binary(Binary::new(BinarySubtype::Md5, vec![1, 2, 3]).unwrap())
    );
    assert_eq!(Bson::from(-48i32).element_type(), ElementType::Int32);
    assert_eq!(Bson::from(-48i64).element_type(), ElementType::Int64);
    assert_eq!(Bson::from(48u32), Bson::Int32(48));
    let oid = ObjectId::new();
    assert_eq!(Bson::from(oid.bytes()), Bson::ObjectId(oid));
    assert_eq!(
        Bson::from(vec![1, 2, 3]),
        Bson::Array(vec![Bson::Int32(1), Bson::Int32(2), Bson::Int32(3)])
    );
    assert_eq!(Bson::from(None::<i32>), Bson::Null);
    assert_eq!(Bson::from(Some(4)), Bson::Int32(4));
    assert_eq!(
        Bson::from(Timestamp {
            time: 1,
            increment: 2
        })
        .element_type(),
        ElementType::Timestamp
    );
}

#[test]
fn lossless_numeric_conversions() {
    assert_eq!(Bson::Double(5.0).to_i32(), Some(5));
    assert_eq!(Bson::Double(5.5).to_i32(), None);
    assert_eq!(Bson::Int64(i64::from(i32::MAX) + 1).to_i32(), None);
    assert_eq!(Bson::Int64(7).to_i32(), Some(7));
    assert_eq!(Bson::Int32(7).to_f64(), Some(7.0));
    assert_eq!(Bson::Int64((1 << 53) + 1).to_f64(), None);
    assert_eq!(Bson::String("5".into()).to_i64(), None);
    assert_eq!(Bson::Double(f64::NAN).to_i64(), None);

    let decimal: Decimal128 = "5.00".parse().unwrap();
    assert_eq!(Bson::Decimal128(decimal).to_i32(), Some(5));
    assert_eq!(
        Bson::Double(0.1).to_decimal128(),
        Some("0.1".parse().unwrap())
    );
}

#[test]
fn strict_accessors() {
    assert_eq!(Bson::Int32(5).as_i32(), Some(5));
    assert_eq!(Bson::Int32(5).as_i64(), None);
    assert_eq!(Bson::Double(5.0).as_i32(), None);
    assert_eq!(Bson::String("x".into()).as_str(), Some("x"));
    assert_eq!(Bson::Null.as_null(), Some(()));
    assert!(Bson::Boolean(true).as_bool().unwrap());
}

#[test]
fn cross_width_equality() {
    assert_eq!(Bson::Int32(1), Bson::Int64(1));
    assert_eq!(Bson::Int64(1), Bson::Double(1.0));
    assert_ne!(Bson::Int32(1), Bson::Double(1.5));
    assert_ne!(Bson::Int32(1), Bson::String("1".into()));
    assert_eq!(Bson::Double(f64::NAN), Bson::Double(f64::NAN));
    assert_eq!(Bson::Double(0.0), Bson::Double(-0.0));

    // nested values compare the same way
    assert_eq!(bson!([1, { "a": 2 }]), bson!([1.0, { "a": 2_i64 }]));
}

#[test]
fn equal_values_hash_equally() {
    let values = [
        bson!({ "a": 1 }),
        bson!({ "a": 1_i64 }),
        bson!({ "a": 1.0 }),
        bson!({ "a": 2 }),
    ];
    let set: HashSet<_> = values.into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn display() {
    let oid = ObjectId::parse_str("56e1fc72e0c917e9c4714161").unwrap();
    let value = bson!({
        "float": 2.5,
        "string": "hello",
        "array": ["testing", 1, true, [1, 2]],
        "null": null,
        "regexp": Regex::new("s[ao]d", "i"),
        "with_wrapped_parens": (-20),
        "timestamp": Timestamp { time: 0, increment: 229_999_444 },
        "binary": Binary::new(BinarySubtype::Md5, b"thingies".to_vec()).unwrap(),
        "_id": oid,
        "date": DateTime::from_millis(0),
        "min": Bson::MinKey,
    });

    assert_eq!(
        value.to_string(),
        "{ \"float\": 2.5, \"string\": \"hello\", \"array\": [\"testing\", 1, true, [1, 2]], \
         \"null\": null, \"regexp\": /s[ao]d/i, \"with_wrapped_parens\": -20, \"timestamp\": \
         Timestamp(0, 229999444), \"binary\": Binary(0x5, dGhpbmdpZXM=), \"_id\": \
         ObjectId(\"56e1fc72e0c917e9c4714161\"), \"date\": DateTime(\"1970-01-01T00:00:00Z\"), \
         \"min\": MinKey }"
    );
}

#[test]
fn extjson_numbers_fit_narrowest_type() {
    let value = Bson::try_from(json!({
        "small": 5,
        "big": 5_000_000_000_i64,
        "float": 2.5,
        "huge": 10_000_000_000_000_000_000_u64,
    }))
    .unwrap();
    let doc = value.as_document().unwrap();
    assert_eq!(doc.get_raw("small").unwrap().element_type(), ElementType::Int32);
    assert_eq!(doc.get_raw("big").unwrap().element_type(), ElementType::Int64);
    assert_eq!(doc.get_raw("float").unwrap().element_type(), ElementType::Double);
    assert_eq!(doc.get_f64("huge").unwrap(), 1e19);
}

#[test]
fn extjson_errors_carry_location() {
    let err = Bson::try_from(json!({ "outer": [1, { "$numberInt": "nope" }] })).unwrap_err();
    assert!(err.is_extended_json());
    assert_eq!(err.key.as_deref(), Some("outer"));

    let err = Bson::try_from(json!([1, { "$oid": "xyz" }])).unwrap_err();
    assert_eq!(err.index, Some(1));
}
