use std::fs;
use std::path::Path;

use sigeval::commands::{collect_signature_sets, compile_filter, parse_mode, uniqueness_subject};
use sigeval_core::corpus::{EvaluationLayout, EvaluationMode};
use tempfile::tempdir;

#[test]
fn parses_known_modes() {
    for mode in [EvaluationMode::GroundTruth, EvaluationMode::Crates, EvaluationMode::NoReference] {
        assert_eq!(parse_mode(mode.as_str()).expect("should parse"), mode);
    }
}

#[test]
fn rejects_unknown_mode() {
    let err = parse_mode("bogus").unwrap_err();
    assert!(err.to_string().contains("Invalid mode"));
}

#[test]
fn filter_is_optional_and_validated() {
    assert!(compile_filter(None).unwrap().is_none());
    let re = compile_filter(Some("^1\\.78")).unwrap().unwrap();
    assert!(re.is_match("1.78.0/x86_64-unknown-linux-gnu/release/hello"));
    let err = compile_filter(Some("(")).unwrap_err();
    assert!(err.to_string().contains("Invalid filter pattern"));
}

#[test]
fn signature_sets_are_discovered_and_sorted() {
    let dir = tempdir().unwrap();
    for name in ["rust-std-1-78-0.sig", "rust-std-1-77-0.sig", "notes.txt"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    fs::create_dir(dir.path().join("nested.sig")).unwrap();

    let sets = collect_signature_sets(dir.path()).unwrap();
    let versions: Vec<&str> = sets.iter().map(|s| s.version.as_str()).collect();
    assert_eq!(versions, vec!["1.77.0", "1.78.0"]);
    assert!(collect_signature_sets(&dir.path().join("missing")).is_err());
}

#[test]
fn subject_version_comes_from_the_corpus_path() {
    let layout = EvaluationLayout::new("/corpus");
    let path = Path::new("target/1.78.0/x86_64-unknown-linux-gnu/release/hello.stripped");
    let subject = uniqueness_subject(&layout, path);
    assert_eq!(subject.version, "1.78.0");
    assert_eq!(subject.key(), "target/1.78.0/x86_64-unknown-linux-gnu/release/hello.stripped");
}
