use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use serde_bytes::ByteBuf;
use time::{format_description::OwnedFormatItem, macros::format_description};

use crate::{
    Binary,
    Bson,
    DateTime,
    deserialize_from_bson,
    doc,
    oid::ObjectId,
    ser::{BytesEncodingStrategy, DateEncodingStrategy, Encoder, EncoderOptions},
    serialize_to_bson,
    serialize_to_document,
    spec::{BinarySubtype, ElementType},
};

#[test]
#[allow(clippy::float_cmp)]
fn floating_point() {
    let obj = Bson::Double(240.5);
    let f: f64 = deserialize_from_bson(obj.clone()).unwrap();
    assert_eq!(f, 240.5);

    let deser: Bson = serialize_to_bson(&f).unwrap();
    assert_eq!(obj, deser);
}

#[test]
fn string() {
    let obj = Bson::String("avocado".to_owned());
    let s: String = deserialize_from_bson(obj.clone()).unwrap();
    assert_eq!(s, "avocado");

    let deser: Bson = serialize_to_bson(&s).unwrap();
    assert_eq!(obj, deser);
}

#[test]
fn arr() {
    let obj = Bson::Array(vec![
        Bson::Int32(0),
        Bson::Int32(1),
        Bson::Int32(2),
        Bson::Int32(3),
    ]);
    let arr: Vec<i32> = deserialize_from_bson(obj.clone()).unwrap();
    assert_eq!(arr, vec![0i32, 1i32, 2i32, 3i32]);

    let deser: Bson = serialize_to_bson(&arr).unwrap();
    assert_eq!(deser, obj);
}

#[test]
fn boolean() {
    let obj = Bson::Boolean(true);
    let b: bool = deserialize_from_bson(obj.clone()).unwrap();
    assert!(b);

    let deser: Bson = serialize_to_bson(&b).unwrap();
    assert_eq!(deser, obj);
}

#[test]
fn unsigned_round_trips() {
    let obj: Bson = serialize_to_bson(&u8::MAX).unwrap();
    assert_eq!(obj.element_type(), ElementType::Int32);
    assert_eq!(deserialize_from_bson::<u8>(obj).unwrap(), u8::MAX);

    let obj: Bson = serialize_to_bson(&u16::MAX).unwrap();
    assert_eq!(deserialize_from_bson::<u16>(obj).unwrap(), u16::MAX);

    let obj: Bson = serialize_to_bson(&u32::MAX).unwrap();
    assert_eq!(obj.element_type(), ElementType::Int64);
    assert_eq!(deserialize_from_bson::<u32>(obj).unwrap(), u32::MAX);

    let obj: Bson = serialize_to_bson(&u64::MIN).unwrap();
    assert_eq!(obj, Bson::Int32(0));
    assert_eq!(deserialize_from_bson::<u64>(obj).unwrap(), u64::MIN);
}

#[test]
fn native_integers_take_the_narrowest_width() {
    assert_eq!(
        serialize_to_bson(&101_i64).unwrap().element_type(),
        ElementType::Int32
    );
    assert_eq!(
        serialize_to_bson(&(i64::from(i32::MAX) + 1)).unwrap(),
        Bson::Int64(i64::from(i32::MAX) + 1)
    );
    assert_eq!(
        serialize_to_bson(&i64::MIN).unwrap().element_type(),
        ElementType::Int64
    );

    // an explicit Int64 keeps its width
    let doc = serialize_to_document(&doc! { "n": Bson::Int64(1) }).unwrap();
    assert_eq!(doc.get_raw("n").unwrap().element_type(), ElementType::Int64);
}

#[test]
fn large_unsigned_values() {
    let two_pow_63 = 1_u64 << 63;
    assert_eq!(
        serialize_to_bson(&two_pow_63).unwrap(),
        Bson::Double(9_223_372_036_854_775_808.0)
    );

    let err = serialize_to_bson(&(two_pow_63 + 1)).unwrap_err();
    assert!(err.is_invalid_value());

    let err = serialize_to_bson(&u64::MAX).unwrap_err();
    assert!(err.is_invalid_value());

    assert_eq!(serialize_to_bson(&7_u128).unwrap(), Bson::Int32(7));
    assert!(serialize_to_bson(&u128::MAX).unwrap_err().is_invalid_value());
}

#[test]
fn errors_carry_location() {
    #[derive(Serialize)]
    struct Inner {
        values: Vec<u64>,
    }

    #[derive(Serialize)]
    struct Outer {
        inner: Inner,
    }

    let err = serialize_to_bson(&Outer {
        inner: Inner {
            values: vec![1, u64::MAX],
        },
    })
    .unwrap_err();
    assert!(err.is_invalid_value());
    assert_eq!(err.index, Some(1));
    assert_eq!(err.key, None);

    let mut map = BTreeMap::new();
    map.insert("big", u64::MAX);
    let err = serialize_to_bson(&map).unwrap_err();
    assert_eq!(err.key.as_deref(), Some("big"));
}

#[test]
fn map_keys_must_be_strings() {
    let mut map = BTreeMap::new();
    map.insert(1, "one");
    assert!(serialize_to_bson(&map).is_err());
}

#[test]
fn encode_rejects_non_documents() {
    assert!(serialize_to_document(&5).is_err());
    assert!(serialize_to_document(&vec![1, 2]).is_err());
}

#[test]
fn oid() {
    let oid = ObjectId::new();
    let obj = Bson::ObjectId(oid);
    let s: BTreeMap<String, String> = deserialize_from_bson(obj.clone()).unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("$oid".to_owned(), oid.to_string());
    assert_eq!(s, expected);

    let deser: Bson = serialize_to_bson(&s).unwrap();
    assert_eq!(deser, obj);
}

#[test]
fn null_byte_keys_are_rejected() {
    let mut map = BTreeMap::new();
    map.insert("a\0b", 1);
    assert!(serialize_to_bson(&map).is_err());
}

#[derive(Serialize)]
struct Event {
    at: DateTime,
}

const AT: DateTime = DateTime::from_millis(1_356_351_330_501);

fn encode_event(strategy: DateEncodingStrategy) -> Bson {
    let encoder = Encoder::with_options(EncoderOptions::builder().date(strategy).build());
    encoder.encode(&Event { at: AT }).unwrap().get("at").unwrap()
}

#[test]
fn date_strategies() {
    assert_eq!(
        encode_event(DateEncodingStrategy::BsonDateTime),
        Bson::DateTime(AT)
    );
    assert_eq!(
        encode_event(DateEncodingStrategy::SecondsSinceEpoch),
        Bson::Double(1_356_351_330.501)
    );

    let millis = encode_event(DateEncodingStrategy::MillisecondsSinceEpoch);
    assert_eq!(millis.element_type(), ElementType::Int64);
    assert_eq!(millis, Bson::Int64(1_356_351_330_501));

    assert_eq!(
        encode_event(DateEncodingStrategy::Iso8601),
        Bson::String("2012-12-24T12:15:30.501Z".into())
    );

    let format = OwnedFormatItem::from(format_description!("[year]/[month]/[day]"));
    assert_eq!(
        encode_event(DateEncodingStrategy::Formatted(format)),
        Bson::String("2012/12/24".into())
    );

    let custom = DateEncodingStrategy::Custom(Arc::new(|dt: DateTime| -> crate::error::Result<Bson> {
        Ok(Bson::String(format!("t={}", dt.timestamp_millis())))
    }));
    assert_eq!(
        encode_event(custom),
        Bson::String("t=1356351330501".into())
    );
}

#[test]
fn date_strategy_skips_untyped_datetimes() {
    let encoder = Encoder::with_options(
        EncoderOptions::builder()
            .date(DateEncodingStrategy::Iso8601)
            .build(),
    );
    let doc = encoder.encode(&doc! { "at": AT }).unwrap();
    assert_eq!(doc.get("at"), Some(Bson::DateTime(AT)));
}

#[derive(Serialize)]
struct Blob {
    data: ByteBuf,
    plain: Vec<u8>,
}

fn encode_blob(strategy: BytesEncodingStrategy) -> crate::Document {
    let encoder = Encoder::with_options(EncoderOptions::builder().bytes(strategy).build());
    encoder
        .encode(&Blob {
            data: ByteBuf::from(vec![1, 2, 255]),
            plain: vec![4],
        })
        .unwrap()
}

#[test]
fn bytes_strategies() {
    let doc = encode_blob(BytesEncodingStrategy::default());
    assert_eq!(
        doc.get("data"),
        Some(Bson::Binary(Binary::generic(vec![1, 2, 255])))
    );
    // a plain Vec<u8> is a sequence
    assert_eq!(doc.get("plain"), Some(Bson::Array(vec![Bson::Int32(4)])));

    let doc = encode_blob(BytesEncodingStrategy::Binary(BinarySubtype::UserDefined(0x80)));
    assert_eq!(
        doc.get_binary("data").unwrap().subtype(),
        BinarySubtype::UserDefined(0x80)
    );

    let doc = encode_blob(BytesEncodingStrategy::Base64);
    assert_eq!(doc.get_str("data").unwrap(), "AQL/");

    let doc = encode_blob(BytesEncodingStrategy::DeferredToNative);
    assert_eq!(
        doc.get_array("data").unwrap(),
        vec![Bson::Int32(1), Bson::Int32(2), Bson::Int32(255)]
    );

    let doc = encode_blob(BytesEncodingStrategy::Custom(Arc::new(|bytes: &[u8]| -> crate::error::Result<Bson> {
        Ok(Bson::String(hex::encode(bytes)))
    })));
    assert_eq!(doc.get_str("data").unwrap(), "0102ff");
}

#[test]
fn uuid_subtype_needs_sixteen_bytes() {
    let encoder = Encoder::with_options(
        EncoderOptions::builder()
            .bytes(BytesEncodingStrategy::Binary(BinarySubtype::Uuid))
            .build(),
    );
    let err = encoder
        .encode(&Blob {
            data: ByteBuf::from(vec![0; 15]),
            plain: Vec::new(),
        })
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.key.as_deref(), Some("data"));
}

#[test]
fn human_readable_flag() {
    #[derive(Serialize)]
    struct Id {
        id: uuid::Uuid,
    }

    let value = Id {
        id: uuid::Uuid::nil(),
    };

    let doc = serialize_to_document(&value).unwrap();
    assert_eq!(doc.get_binary_generic("id").unwrap(), &[0; 16]);

    let encoder = Encoder::with_options(EncoderOptions::builder().human_readable(true).build());
    assert!(encoder.options().human_readable);
    let doc = encoder.encode(&value).unwrap();
    assert_eq!(
        doc.get_str("id").unwrap(),
        "00000000-0000-0000-0000-000000000000"
    );
}
