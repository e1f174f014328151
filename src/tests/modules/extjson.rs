use crate::{
    Binary,
    Bson,
    DateTime,
    Document,
    Regex,
    Timestamp,
    doc,
    oid::ObjectId,
    spec::BinarySubtype,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn canonical_and_relaxed_output() {
    let doc = doc! { "i": 1, "l": 2_i64, "f": 1.0, "d": DateTime::from_millis(0) };

    assert_eq!(
        doc.to_canonical_extjson_string(),
        r#"{"i":{"$numberInt":"1"},"l":{"$numberLong":"2"},"f":{"$numberDouble":"1.0"},"d":{"$date":{"$numberLong":"0"}}}"#
    );
    assert_eq!(
        doc.to_relaxed_extjson_string(),
        r#"{"i":1,"l":2,"f":1.0,"d":{"$date":"1970-01-01T00:00:00Z"}}"#
    );
}

#[test]
fn relaxed_dates_outside_the_readable_range() {
    let before_epoch = Bson::DateTime(DateTime::from_millis(-284_643_869_501));
    assert_eq!(
        before_epoch.into_relaxed_extjson(),
        json!({ "$date": { "$numberLong": "-284643869501" } })
    );

    let with_millis = Bson::DateTime(DateTime::from_millis(1_356_351_330_501));
    assert_eq!(
        with_millis.into_relaxed_extjson(),
        json!({ "$date": "2012-12-24T12:15:30.501Z" })
    );
}

#[test]
fn relaxed_non_finite_doubles_stay_wrapped() {
    assert_eq!(
        Bson::Double(f64::NAN).into_relaxed_extjson(),
        json!({ "$numberDouble": "NaN" })
    );
    assert_eq!(
        Bson::Double(f64::NEG_INFINITY).into_relaxed_extjson(),
        json!({ "$numberDouble": "-Infinity" })
    );
    assert_eq!(
        Bson::Double(-0.0).into_canonical_extjson(),
        json!({ "$numberDouble": "-0.0" })
    );
}

#[test]
fn wrapper_types() {
    let oid = ObjectId::parse_str("56e1fc72e0c917e9c4714161").unwrap();
    let value = Bson::try_from(json!({
        "oid": { "$oid": "56e1fc72e0c917e9c4714161" },
        "sym": { "$symbol": "abc" },
        "re": { "$regularExpression": { "pattern": "abc", "options": "mi" } },
        "dec": { "$numberDecimal": "1" },
        "bin": { "$binary": { "base64": "//8=", "subType": "80" } },
        "code": { "$code": "abc" },
        "ts": { "$timestamp": { "t": 123_456_789, "i": 42 } },
        "min": { "$minKey": 1 },
        "max": { "$maxKey": 1 },
        "undef": { "$undefined": true },
    }))
    .unwrap();
    let doc = value.as_document().unwrap();

    assert_eq!(doc.get_object_id("oid").unwrap(), oid);
    assert_eq!(doc.get("sym"), Some(Bson::Symbol("abc".into())));
    assert_eq!(
        doc.get("re"),
        Some(Bson::RegularExpression(Regex::new("abc", "im")))
    );
    assert_eq!(
        doc.get("dec"),
        Some(Bson::Decimal128("1".parse().unwrap()))
    );
    assert_eq!(
        doc.get_binary("bin").unwrap(),
        Binary::new(BinarySubtype::UserDefined(0x80), vec![0xff, 0xff]).unwrap()
    );
    assert_eq!(doc.get("code"), Some(Bson::JavaScriptCode("abc".into())));
    assert_eq!(
        doc.get_timestamp("ts").unwrap(),
        Timestamp {
            time: 123_456_789,
            increment: 42
        }
    );
    assert_eq!(doc.get("min"), Some(Bson::MinKey));
    assert_eq!(doc.get("max"), Some(Bson::MaxKey));
    assert_eq!(doc.get("undef"), Some(Bson::Undefined));
}

#[test]
fn from_extjson_str_accepts_mixed_modes() {
    let doc = Document::from_extjson_str(
        r#"{"a": {"$numberLong": "5"}, "b": 5, "c": {"$date": "2012-12-24T12:15:30.501Z"}}"#,
    )
    .unwrap();
    assert_eq!(doc.get_i64("a").unwrap(), 5);
    assert_eq!(doc.get_i32("b").unwrap(), 5);
    assert_eq!(
        doc.get_datetime("c").unwrap(),
        DateTime::from_millis(1_356_351_330_501)
    );

    // the top level has to be an object
    assert!(Document::from_extjson_str("[1, 2]").is_err());
    // and has to be JSON at all
    assert!(Document::from_extjson_str("{").unwrap_err().is_extended_json());
}

#[test]
fn malformed_wrappers_are_rejected() {
    let cases = [
        json!({ "$numberLong": 5 }),
        json!({ "$numberLong": "five" }),
        json!({ "$numberInt": "2147483648" }),
        json!({ "$minKey": 2 }),
        json!({ "$maxKey": 0 }),
        json!({ "$oid": "56e1fc72e0c917e9c47141" }),
        json!({ "$uuid": "73ffd26444b34c6990e8e7d1dfc035d4" }),
        json!({ "$binary": { "base64": "//8=", "subType": "zz" } }),
        json!({ "$date": "yesterday" }),
        json!({ "$numberInt": "1", "extra": true }),
    ];

    for case in cases {
        let err = Bson::try_from(case.clone()).unwrap_err();
        assert!(err.is_extended_json(), "{}: {:?}", case, err);
    }
}

#[test]
fn uuid_wrapper() {
    let value = Bson::try_from(json!({ "$uuid": "73ffd264-44b3-4c69-90e8-e7d1dfc035d4" })).unwrap();
    let binary = value.as_binary().unwrap();
    assert_eq!(binary.subtype(), BinarySubtype::Uuid);
    assert_eq!(
        hex::encode(binary.bytes()),
        "73ffd26444b34c6990e8e7d1dfc035d4"
    );

    // written back as the canonical $binary form
    assert_eq!(
        value.into_canonical_extjson(),
        json!({ "$binary": { "base64": "c//SZESzTGmQ6OfR38A11A==", "subType": "04" } })
    );
}

#[test]
fn legacy_forms() {
    assert_eq!(
        Bson::try_from(json!({ "$regex": "^a", "$options": "xi" })).unwrap(),
        Bson::RegularExpression(Regex::new("^a", "ix"))
    );

    // a query operator with a nested pattern stays a document
    let query = Bson::try_from(json!({ "$regex": { "$regularExpression": { "pattern": "a", "options": "" } }, "$options": "i" })).unwrap();
    assert!(query.as_document().is_some());

    let query = Bson::try_from(json!({ "$regex": "a", "$options": "i", "$eq": 1 })).unwrap();
    assert_eq!(query.as_document().unwrap().len(), 3);

    assert_eq!(
        Bson::try_from(json!({ "$date": 1_356_351_330_501_i64 })).unwrap(),
        Bson::DateTime(DateTime::from_millis(1_356_351_330_501))
    );
}

#[test]
fn code_with_scope() {
    let value = Bson::try_from(json!({ "$code": "abcd", "$scope": { "x": 1 } })).unwrap();
    assert_eq!(
        value,
        Bson::JavaScriptCodeWithScope(crate::JavaScriptCodeWithScope {
            code: "abcd".into(),
            scope: doc! { "x": 1 },
        })
    );
    assert_eq!(
        value.into_canonical_extjson(),
        json!({ "$code": "abcd", "$scope": { "x": { "$numberInt": "1" } } })
    );
}

#[test]
fn canonical_round_trip_preserves_types() {
    let original = doc! {
        "i": 1,
        "l": 1_i64,
        "f": 1.0,
        "nested": { "arr": [1_i64, 2.5, "s"] },
        "ts": Timestamp { time: 1, increment: 2 },
        "dt": DateTime::from_millis(-1),
    };

    let text = original.to_canonical_extjson_string();
    let parsed = Document::from_extjson_str(&text).unwrap();
    assert_eq!(parsed.as_bytes(), original.as_bytes());

    // relaxed output narrows integers on the way back
    let relaxed = Document::from_extjson_str(original.to_relaxed_extjson_string()).unwrap();
    assert_eq!(relaxed, original);
    assert_ne!(relaxed.as_bytes(), original.as_bytes());
}
