use bson_core::{Bson, Document, doc};
use pretty_assertions::assert_eq;

#[test]
fn merge_overwrites_and_appends() {
    let mut doc = doc! { "a": 1, "b": 2 };
    doc.merge(&doc! { "b": 3, "c": 4 }).unwrap();

    assert_eq!(doc, doc! { "a": 1, "b": 3, "c": 4 });
    assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
}

#[test]
fn copies_do_not_observe_writes() {
    let original = doc! { "n": 1, "s": "text" };
    let mut copies: Vec<Document> = (0..4).map(|_| original.clone()).collect();

    for (i, copy) in copies.iter_mut().enumerate() {
        copy.insert("n", i as i32);
        copy.insert("s", format!("copy {}", i));
    }

    assert_eq!(original, doc! { "n": 1, "s": "text" });
    for (i, copy) in copies.iter().enumerate() {
        assert_eq!(copy.get_i32("n").unwrap(), i as i32);
        assert_eq!(copy.get_str("s").unwrap(), format!("copy {}", i));
    }
}

#[test]
fn documents_cross_threads() {
    let doc = doc! { "shared": [1, 2, 3] };
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mut doc = doc.clone();
            std::thread::spawn(move || {
                doc.insert("thread", i);
                doc
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let doc = handle.join().unwrap();
        assert_eq!(doc.get("thread"), Some(Bson::Int32(i as i32)));
    }
    assert!(!doc.contains_key("thread"));
}
