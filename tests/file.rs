use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

use json_doc_path::{ErrorKind, Format, JsonFile, WriteOptions};
use serde_json::{json, Value};
use tempfile::TempDir;

const BOOKS: &str = r#"[
  {"title": "Moby Dick", "author": "Herman Melville"},
  {"title": "The Hunger Games", "author": "Suzanne Collins"}
]"#;

fn fixture(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.json");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[track_caller]
fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn open_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonFile::open(dir.path().join("nope.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("nope.json"), "{err}");

    let (_dir, path) = fixture("{\"a\": ");
    let err = JsonFile::open(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn get_string() {
    let (_dir, path) = fixture(BOOKS);
    let file = JsonFile::open(&path).unwrap();
    assert_eq!(file.path(), path.as_path());
    assert_eq!(file.options(), WriteOptions::default());
    assert_eq!(file.get_string("x[1].author").unwrap(), "Suzanne Collins");
    assert_eq!(file.get_string("[0].title").unwrap(), "Moby Dick");

    let err = file.get_string("x[0]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.to_string(), "expected string, found object");

    let err = file.get_node("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSpecificNode);
    let err = file.get_node("x[2]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathNotFound);
    let err = file.get_node("x[two]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathSyntax);
}

#[test]
fn set_string() {
    let (_dir, path) = fixture(BOOKS);
    let mut file = JsonFile::open(&path).unwrap();
    file.set_string("x[1].author", "Catniss").unwrap();
    assert_eq!(file.get_string("x[1].author").unwrap(), "Catniss");

    let on_disk = read_json(&path);
    assert_eq!(on_disk[1]["author"], json!("Catniss"));
    assert_eq!(on_disk[0], json!({"title": "Moby Dick", "author": "Herman Melville"}));

    // a file opened later sees the change
    let again = JsonFile::open(&path).unwrap();
    assert_eq!(again.get_string("x[1].author").unwrap(), "Catniss");
}

#[test]
fn set_rejected_leaves_file_alone() {
    let (_dir, path) = fixture(BOOKS);
    let mut file = JsonFile::open(&path).unwrap();

    let err = file.set_string("x[1].publisher", "Scholastic").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    let err = file.set_string("x[1]", "book").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    let err = file.set_string("x[5].author", "nobody").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathNotFound);
    let err = file.set_string("x", "everything").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSpecificNode);

    assert_eq!(fs::read_to_string(&path).unwrap(), BOOKS);
    assert_eq!(file.document().value(), &serde_json::from_str::<Value>(BOOKS).unwrap());
}

#[test]
fn set_value() {
    let (_dir, path) = fixture(r#"{"a": {"b": 1}}"#);
    let mut file = JsonFile::open_with(&path, WriteOptions::compact()).unwrap();
    file.set_value("a.b", json!([1, {"c": null}])).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"a":{"b":[1,{"c":null}]}}"#);
}

#[test]
fn add_json() {
    let (_dir, path) = fixture(r#"[{"x":"7","y":"15"}]"#);
    let mut file = JsonFile::open_with(&path, WriteOptions::compact()).unwrap();
    file.add_json("x", br#"{"x":"2","y":"3"}"#).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"[{"x":"7","y":"15"},{"x":"2","y":"3"}]"#
    );
    assert_eq!(file.get_string("x[1].y").unwrap(), "3");
}

#[test]
fn add_json_errors() {
    let contents = r#"{"list": [{"k": "v"}]}"#;
    let (_dir, path) = fixture(contents);
    let mut file = JsonFile::open(&path).unwrap();

    let err = file.add_json("list[0].k", b"1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    let err = file.add_json("list[0]", b"1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    let err = file.add_json("x", b"1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MutationRejected);
    let err = file.add_json("list", b"{\"k\": ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    let err = file.add_json("nope", b"1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathNotFound);

    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn write_options() {
    let (_dir, path) = fixture(r#"{"a": [1, 2], "b": "c"}"#);

    let mut file = JsonFile::open(&path).unwrap();
    file.set_string("b", "d").unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": \"d\"\n}"
    );

    let options = WriteOptions::compact().with_trailing_newline(true);
    assert_eq!(options.format, Format::Compact);
    let mut file = JsonFile::open_with(&path, options).unwrap();
    file.set_string("b", "e").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":[1,2],\"b\":\"e\"}\n");

    assert_eq!(file.encode().unwrap(), br#"{"a":[1,2],"b":"e"}"#);
    assert_ne!(file.encode().unwrap(), file.get_all().unwrap());

    let options = WriteOptions::default().with_trailing_newline(true);
    let file = JsonFile::open_with(&path, options).unwrap();
    assert_eq!(file.encode().unwrap(), file.get_all().unwrap());
    file.save().unwrap();
    assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
}

#[test]
fn get_all() {
    let (_dir, path) = fixture(r#"{"b":1,"a":[true]}"#);
    let file = JsonFile::open(&path).unwrap();
    // member order is kept
    assert_eq!(
        String::from_utf8(file.get_all().unwrap()).unwrap(),
        "{\n  \"b\": 1,\n  \"a\": [\n    true\n  ]\n}"
    );
}

#[test]
fn reload() {
    let (_dir, path) = fixture(r#"{"a": "1"}"#);
    let mut file = JsonFile::open(&path).unwrap();
    fs::write(&path, r#"{"a": "2"}"#).unwrap();
    assert_eq!(file.get_string("a").unwrap(), "1");
    file.reload().unwrap();
    assert_eq!(file.get_string("a").unwrap(), "2");

    fs::write(&path, "not json").unwrap();
    assert_eq!(file.reload().unwrap_err().kind(), ErrorKind::Parse);
    fs::remove_file(&path).unwrap();
    assert_eq!(file.reload().unwrap_err().kind(), ErrorKind::Io);
}

#[test]
fn concurrent_writes() {
    let (_dir, path) = fixture("[]");
    let file = Arc::new(JsonFile::open(&path).unwrap());

    let short = b"[1]".to_vec();
    let long = serde_json::to_vec(&vec![12345; 50_000]).unwrap();
    let payloads = [short.clone(), long.clone()];
    let barrier = Arc::new(Barrier::new(payloads.len()));

    for round in 0..50 {
        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|data| {
                let file = Arc::clone(&file);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    file.write(&data).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // the file holds one whole payload, never a mix of both
        let contents = fs::read(&path).unwrap();
        assert!(
            contents == short || contents == long,
            "round {round}: file has {} bytes",
            contents.len()
        );
    }
}

#[test]
fn concurrent_saves_and_reads() {
    let (_dir, path) = fixture(BOOKS);
    let file = Arc::new(JsonFile::open(&path).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let file = Arc::clone(&file);
            thread::spawn(move || {
                for _ in 0..20 {
                    file.save().unwrap();
                    assert_eq!(file.get_string("x[0].title").unwrap(), "Moby Dick");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(read_json(&path), serde_json::from_str::<Value>(BOOKS).unwrap());
}

#[test]
fn one_shot_helpers() {
    let (_dir, path) = fixture(BOOKS);
    assert_eq!(
        json_doc_path::get_string(&path, "x[1].author").unwrap(),
        "Suzanne Collins"
    );

    json_doc_path::set_string(&path, "x[1].author", "Catniss").unwrap();
    assert_eq!(
        json_doc_path::get_string(&path, "x[1].author").unwrap(),
        "Catniss"
    );

    json_doc_path::add_json(&path, "x", br#"{"title": "New", "author": "Someone"}"#).unwrap();
    assert_eq!(json_doc_path::get_string(&path, "x[2].title").unwrap(), "New");
    assert_eq!(read_json(&path).as_array().unwrap().len(), 3);

    let err = json_doc_path::get_string(&path, "x[3].title").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathNotFound);
}
