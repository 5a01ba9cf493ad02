use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;

use sigeval_core::uniqueness::{
    build_matrix, check_alignment, AnalysisHost, AnalysisSession, RecordedHost, SignatureSet,
    UniquenessCounts, UniquenessSubject,
};
use sigeval_core::{EvalError, EvalResult};

fn subject(version: &str) -> UniquenessSubject {
    UniquenessSubject::from_path(
        format!("target/{version}/x86_64-unknown-linux-gnu/release/hello"),
        Path::new("target"),
    )
}

fn sig(version: &str) -> SignatureSet {
    SignatureSet::from_path(format!("target/uniqueness_sigs/rust-std-{}.sig", version.replace('.', "-")))
}

/// Host that counts how many sessions it opened and never matches anything.
#[derive(Default)]
struct CountingHost {
    opened: Cell<usize>,
}

struct NullSession;

impl AnalysisSession for NullSession {
    type Snapshot = ();

    fn total_functions(&self) -> usize {
        0
    }

    fn snapshot(&mut self) -> EvalResult<()> {
        Ok(())
    }

    fn apply_signature_set(&mut self, _set: &SignatureSet) -> EvalResult<usize> {
        Ok(0)
    }

    fn restore(&mut self, _snapshot: ()) -> EvalResult<()> {
        Ok(())
    }
}

impl AnalysisHost for CountingHost {
    type Session = NullSession;

    fn open(&self, _subject: &UniquenessSubject) -> EvalResult<NullSession> {
        self.opened.set(self.opened.get() + 1);
        Ok(NullSession)
    }
}

/// Host whose sessions can never revert a trial.
struct BrokenRollbackHost;

struct BrokenRollbackSession;

impl AnalysisSession for BrokenRollbackSession {
    type Snapshot = ();

    fn total_functions(&self) -> usize {
        4
    }

    fn snapshot(&mut self) -> EvalResult<()> {
        Ok(())
    }

    fn apply_signature_set(&mut self, _set: &SignatureSet) -> EvalResult<usize> {
        Ok(1)
    }

    fn restore(&mut self, _snapshot: ()) -> EvalResult<()> {
        Err(EvalError::MissingArtifact { path: "undo".into() })
    }
}

impl AnalysisHost for BrokenRollbackHost {
    type Session = BrokenRollbackSession;

    fn open(&self, _subject: &UniquenessSubject) -> EvalResult<BrokenRollbackSession> {
        Ok(BrokenRollbackSession)
    }
}

type Recording<'a> = (&'a UniquenessSubject, usize, Vec<(&'a SignatureSet, usize)>);

fn recorded(entries: Vec<Recording<'_>>) -> RecordedHost {
    let mut counts = UniquenessCounts::default();
    for (subject, total, matches) in entries {
        counts.total_functions.insert(subject.key(), total);
        let row: BTreeMap<String, usize> =
            matches.iter().map(|(set, count)| (set.name(), *count)).collect();
        counts.matches.insert(subject.key(), row);
    }
    RecordedHost::new(counts)
}

#[test]
fn versions_are_parsed_from_paths_and_file_names() {
    assert_eq!(subject("1.78.0").version, "1.78.0");
    assert_eq!(sig("1.78.0").version, "1.78.0");
    assert_eq!(sig("1.78.0").name(), "rust-std-1-78-0.sig");
    assert_eq!(
        UniquenessSubject::from_path("elsewhere/1.70.0/hello", Path::new("target")).version,
        "1.70.0"
    );
}

#[test]
fn misaligned_pairs_abort_before_any_session() {
    let host = CountingHost::default();
    let subjects = [subject("1.77.0"), subject("1.78.0")];
    let sets = [sig("1.77.0"), sig("1.79.0")];

    let err = build_matrix(&host, &subjects, &sets).unwrap_err();
    assert!(matches!(err, EvalError::AlignmentViolation { index: 1, .. }));
    assert!(err.is_fatal());
    assert_eq!(host.opened.get(), 0);
}

#[test]
fn length_mismatch_is_an_alignment_error() {
    let err = check_alignment(&[subject("1.78.0")], &[]).unwrap_err();
    assert!(matches!(err, EvalError::AlignmentLength { binaries: 1, signature_sets: 0 }));
}

#[test]
fn alignment_uses_sorted_order() {
    let host = CountingHost::default();
    let subjects = [subject("1.78.0"), subject("1.77.0")];
    let sets = [sig("1.77.0"), sig("1.78.0")];

    let matrix = build_matrix(&host, &subjects, &sets).unwrap();
    assert_eq!(matrix.versions, vec!["1.77.0", "1.78.0"]);
    assert_eq!(host.opened.get(), 2);
}

#[test]
fn every_trial_starts_from_the_baseline() {
    let s1 = sig("1.77.0");
    let s2 = sig("1.78.0");
    let b1 = subject("1.77.0");
    let b2 = subject("1.78.0");
    let host = recorded(vec![
        (&b1, 10, vec![(&s1, 6), (&s2, 7)]),
        (&b2, 12, vec![(&s1, 3), (&s2, 12)]),
    ]);

    let matrix = build_matrix(&host, &[b1, b2], &[s1, s2]).unwrap();
    assert_eq!(matrix.total_functions, vec![10, 12]);
    assert_eq!(matrix.matrix, vec![vec![6, 7], vec![3, 12]]);
}

#[test]
fn import_stubs_are_excluded_from_totals() {
    let s1 = sig("1.78.0");
    let b1 = subject("1.78.0");
    let mut counts = UniquenessCounts::default();
    counts.total_functions.insert(b1.key(), 5);
    counts.import_stubs.insert(b1.key(), 3);
    counts.matches.insert(b1.key(), [(s1.name(), 4)].into_iter().collect());

    let matrix = build_matrix(&RecordedHost::new(counts), &[b1], &[s1]).unwrap();
    assert_eq!(matrix.total_functions, vec![5]);
    assert_eq!(matrix.matrix, vec![vec![4]]);
}

#[test]
fn recorded_counts_above_the_function_total_are_rejected() {
    let s1 = sig("1.78.0");
    let b1 = subject("1.78.0");
    let mut counts = UniquenessCounts::default();
    counts.total_functions.insert(b1.key(), 5);
    counts.import_stubs.insert(b1.key(), 3);
    counts.matches.insert(b1.key(), [(s1.name(), 9)].into_iter().collect());

    let err = build_matrix(&RecordedHost::new(counts), &[b1], &[s1]).unwrap_err();
    match err {
        EvalError::InvalidRecording { matched, total, .. } => {
            assert_eq!((matched, total), (9, 5));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn recorded_counts_are_reported_unchanged() {
    let s1 = sig("1.77.0");
    let s2 = sig("1.78.0");
    let b1 = subject("1.77.0");
    let b2 = subject("1.78.0");
    let host = recorded(vec![
        (&b1, 8, vec![(&s1, 8), (&s2, 0)]),
        (&b2, 8, vec![(&s1, 5), (&s2, 8)]),
    ]);

    let matrix = build_matrix(&host, &[b1, b2], &[s1, s2]).unwrap();
    assert_eq!(matrix.matrix, vec![vec![8, 0], vec![5, 8]]);
}

#[test]
fn failed_rollback_aborts_the_run() {
    let err = build_matrix(&BrokenRollbackHost, &[subject("1.78.0")], &[sig("1.78.0")]).unwrap_err();
    match err {
        EvalError::RollbackFailed { signature_set, .. } => {
            assert_eq!(signature_set, "rust-std-1-78-0.sig")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_recording_is_reported() {
    let s1 = sig("1.78.0");
    let b1 = subject("1.78.0");
    let host = recorded(vec![(&b1, 4, Vec::new())]);
    let err = build_matrix(&host, &[b1], &[s1]).unwrap_err();
    assert!(matches!(err, EvalError::MissingRecording { .. }));
}

#[test]
fn counts_load_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("uniqueness_counts.json");
    std::fs::write(
        &path,
        r#"{"total_functions": {"a": 3}, "matches": {"a": {"rust-std-1-78-0.sig": 2}}}"#,
    )
    .unwrap();

    let counts = UniquenessCounts::load(&path).unwrap();
    assert_eq!(counts.total_functions["a"], 3);
    assert!(counts.import_stubs.is_empty());
    assert!(matches!(
        UniquenessCounts::load(&dir.path().join("absent.json")),
        Err(EvalError::MissingArtifact { .. })
    ));
}
