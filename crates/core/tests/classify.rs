use sigeval_core::analysis::Classifier;
use sigeval_core::model::{ShapeVerdict, SymbolTable, Verdict};
use sigeval_core::names::{AliasEntry, AliasTable};

const HASH_A: &str = "_ZN4core3fmt5write17h1a2b3c4d5e6f7a8bE";
const HASH_B: &str = "_ZN4core3fmt5write17hdeadbeefcafebabeE";

fn builtin() -> AliasTable {
    AliasTable::builtin()
}

#[test]
fn two_placeholders_are_unknown_regardless_of_digits() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("sub_123", "sub_456"), Verdict::Unknown);
    assert_eq!(classifier.classify("sub_401000", "sub_401000"), Verdict::Unknown);
}

#[test]
fn identical_names_match() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify(HASH_A, HASH_A), Verdict::Matched);
    assert_eq!(classifier.classify("_ZN3foo3barE", "_ZN3foo3barE_1"), Verdict::Matched);
    assert_eq!(classifier.classify("memcpy", "_memcpy"), Verdict::Matched);
}

#[test]
fn hash_only_difference_is_reported_separately() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify(HASH_A, HASH_B), Verdict::DifferentHash);
    assert_eq!(classifier.classify(HASH_B, HASH_A), Verdict::DifferentHash);
    assert_eq!(
        classifier.classify(HASH_A, "_ZN4core3fmt5write17hDEADBEEFCAFEBABEE"),
        Verdict::DifferentHash
    );
}

#[test]
fn pinned_aliases_match() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("__rust_alloc", "j___rdl_alloc"), Verdict::Matched);
    assert_eq!(classifier.classify("_start", "start"), Verdict::Matched);
    assert_eq!(classifier.classify("mainCRTStartup", "start"), Verdict::Matched);

    let empty = AliasTable::empty();
    let bare = Classifier::new(&empty);
    assert_eq!(bare.classify("__rust_alloc", "j___rdl_alloc"), Verdict::Wrong);
}

#[test]
fn aliases_are_directional() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("j___rdl_alloc", "__rust_alloc"), Verdict::Wrong);
}

#[test]
fn extra_aliases_extend_the_builtin_list() {
    let aliases = builtin().with_entries([AliasEntry::new("my_entry", "entry_thunk")]);
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("my_entry", "entry_thunk"), Verdict::Matched);
    assert_eq!(aliases.len(), AliasTable::builtin().len() + 1);
}

#[test]
fn collision_marker_is_a_sig_collision() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("real_func", "unknown_libname_42"), Verdict::SigCollision);
    assert_eq!(classifier.classify("_ZN3foo3barE", "unknown_libname_42_1"), Verdict::SigCollision);
}

#[test]
fn placeholder_asymmetry() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("real_func", "sub_401000"), Verdict::Missed);
    assert_eq!(classifier.classify("sub_401000", "real_func"), Verdict::Matched);
}

#[test]
fn confident_wrong_names_are_wrong() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify("_ZN3foo3barE", "_ZN3foo3bazE"), Verdict::Wrong);
}

#[test]
fn trailing_digits_in_demangled_paths_still_distinguish_functions() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    let real = "_ZN4test6foo_1217h0123456789abcdefE";
    let other = "_ZN4test6foo_1317h0123456789abcdefE";
    assert_eq!(classifier.classify(real, other), Verdict::Wrong);
    assert_eq!(classifier.classify(real, "_ZN4test6foo_1217hfedcba9876543210E"), Verdict::DifferentHash);
}

#[test]
fn shape_verdicts_only_look_at_placeholders() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    assert_eq!(classifier.classify_shape("sub_401000"), ShapeVerdict::Unresolved);
    assert_eq!(classifier.classify_shape("sub_401000_2"), ShapeVerdict::Unresolved);
    assert_eq!(classifier.classify_shape("core::fmt::write"), ShapeVerdict::Recovered);
    assert_eq!(classifier.classify_shape("unknown_libname_1"), ShapeVerdict::Recovered);
}

#[test]
fn classify_tables_skips_unreported_addresses() {
    let aliases = builtin();
    let classifier = Classifier::new(&aliases);
    let reference: SymbolTable = [(0x1000, "foo"), (0x2000, "bar")].into_iter().collect();
    let matched: SymbolTable = [(0x1000, "sub_1000"), (0x3000, "baz")].into_iter().collect();

    let verdicts = classifier.classify_tables(&reference, &matched);
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].address, 0x1000);
    assert_eq!(verdicts[0].verdict, Verdict::Missed);
}
