use crate::{Binary, Bson, Document, Regex, bson, doc, oid::ObjectId, spec::BinarySubtype};
use pretty_assertions::assert_eq;

#[test]
fn standard_format() {
    let id = ObjectId::from_bytes(*b"thisismyname");

    let doc = doc! {
        "float": 2.4,
        "string": "hello",
        "array": ["testing", 1, true, [1, 2]],
        "doc": {
            "fish": "in",
            "a": "barrel",
            "!": 1,
        },
        "bool": true,
        "null": null,
        "regexp": Bson::RegularExpression(Regex::new("s[ao]d", "i")),
        "with_wrapped_parens": (-20),
        "code": Bson::JavaScriptCode("function(x) { return x._id; }".to_owned()),
        "i32": 12,
        "i64": -55_i64,
        "binary": Binary::new(BinarySubtype::Md5, b"thingies".to_vec()).unwrap(),
        "encrypted": Binary::new(BinarySubtype::Encrypted, b"secret".to_vec()).unwrap(),
        "_id": id,
    };

    let expected = format!(
        "{{ \"float\": 2.4, \"string\": \"hello\", \"array\": [\"testing\", 1, true, [1, 2]], \
         \"doc\": {{ \"fish\": \"in\", \"a\": \"barrel\", \"!\": 1 }}, \"bool\": true, \"null\": \
         null, \"regexp\": /s[ao]d/i, \"with_wrapped_parens\": -20, \"code\": function(x) {{ \
         return x._id; }}, \"i32\": 12, \"i64\": -55, \"binary\": Binary(0x5, dGhpbmdpZXM=), \
         \"encrypted\": Binary(0x6, c2VjcmV0), \"_id\": ObjectId(\"{}\") }}",
        hex::encode("thisismyname"),
    );

    assert_eq!(format!("{}", doc), expected);
    assert_eq!(doc.get_i64("i64").unwrap(), -55);
}

#[test]
fn non_trailing_comma() {
    let doc = doc! {
        "a": "foo",
        "b": { "ok": "then" }
    };

    let expected = "{ \"a\": \"foo\", \"b\": { \"ok\": \"then\" } }".to_string();
    assert_eq!(format!("{}", doc), expected);
}

#[test]
fn recursive_macro() {
    let doc = doc! {
        "a": "foo",
        "b": {
            "bar": {
                "harbor": ["seal", false],
                "jelly": 42.0,
            },
            "grape": 27,
        },
        "c": [-7],
        "d": [
            {
                "apple": "ripe",
            }
        ],
        "e": { "single": "test" },
        "n": (Bson::Null),
    };

    let b = doc.get_document("b").unwrap();
    let bar = b.get_document("bar").unwrap();
    assert_eq!(
        bar.get_array("harbor").unwrap(),
        vec![Bson::String("seal".into()), Bson::Boolean(false)]
    );
    assert_eq!(bar.get_f64("jelly").unwrap(), 42.0);
    assert_eq!(b.get_i32("grape").unwrap(), 27);
    assert_eq!(doc.get_array("c").unwrap(), vec![Bson::Int32(-7)]);
    assert_eq!(
        doc.get_array("d").unwrap(),
        vec![Bson::Document(doc! { "apple": "ripe" })]
    );
    assert_eq!(doc.get_document("e").unwrap(), doc! { "single": "test" });
    assert!(doc.is_null("n"));
}

#[test]
fn computed_keys_and_values() {
    let key = String::from("dynamic");
    let values = vec![1, 2, 3];
    let doc = doc! {
        (key.clone()): values.clone(),
        (format!("{}_{}", key, 2)): { "nested": (values.len() as i64) },
    };

    assert_eq!(doc.keys().collect::<Vec<_>>(), ["dynamic", "dynamic_2"]);
    assert_eq!(doc.get("dynamic"), Some(bson!([1, 2, 3])));
    assert_eq!(
        doc.get_document("dynamic_2").unwrap().get_i64("nested").unwrap(),
        3
    );
}

#[test]
fn empty_forms() {
    assert_eq!(doc! {}, Document::new());
    assert_eq!(bson!({}), Bson::Document(Document::new()));
    assert_eq!(bson!([]), Bson::Array(Vec::new()));
    assert_eq!(bson!(null), Bson::Null);
    assert_eq!(bson!([null, [], {}]), Bson::Array(vec![
        Bson::Null,
        Bson::Array(Vec::new()),
        Bson::Document(Document::new()),
    ]));
}

#[test]
fn repeated_key_overwrites_in_place() {
    let doc = doc! { "a": 1, "b": 2, "a": 3 };
    assert_eq!(doc.len(), 2);
    assert_eq!(doc, doc! { "a": 3, "b": 2 });
}

#[test]
fn produces_wire_format() {
    let doc = doc! { "a": [1, 2] };
    assert_eq!(
        hex::encode_upper(doc.as_bytes()),
        "1B0000000461001300000010300001000000103100020000000000"
    );
}

#[test]
#[should_panic]
fn doc_panics_on_null_byte_key() {
    let key = "a\0b";
    let _ = doc! { key: 1 };
}
