use std::fs;
use std::path::Path;

use sigeval::commands::{default_evaluation_name, dump_digest, resolve_root};
use tempfile::tempdir;

#[test]
fn resolve_root_canonicalizes_existing_dirs() {
    let tmp = tempdir().expect("tempdir");
    let nested = tmp.path().join("corpus");
    fs::create_dir(&nested).expect("mkdir");
    let dotted = nested.join("..").join("corpus");

    let resolved = resolve_root(dotted.to_str().expect("utf8")).expect("resolve");
    assert_eq!(resolved, nested.canonicalize().expect("canon"));
}

#[test]
fn resolve_root_keeps_missing_absolute_paths() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("not-built-yet");
    let resolved = resolve_root(missing.to_str().expect("utf8")).expect("resolve");
    assert_eq!(resolved, missing);
}

#[test]
fn evaluation_name_defaults_to_root_directory() {
    assert_eq!(default_evaluation_name(Path::new("/tmp/corpus-root")), "corpus-root");
    assert_eq!(default_evaluation_name(Path::new("/")), "unnamed-evaluation");
}

#[test]
fn dump_digest_is_hex_sha256() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("abc.matched");
    fs::write(&path, b"abc").expect("write");
    assert_eq!(
        dump_digest(&path).expect("hash"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert!(dump_digest(&dir.path().join("missing")).is_err());
}
