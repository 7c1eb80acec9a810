use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn ids_are_dense_from_zero() {
    let mut table = IdentifierTable::new();
    let a = table.intern("alpha");
    let b = table.intern("beta");
    let c = table.intern("gamma");
    assert_eq!((a.raw(), b.raw(), c.raw()), (0, 1, 2));
    assert_eq!(table.len(), 3);
}

#[test]
fn repeated_spelling_reuses_id() {
    let mut table = IdentifierTable::new();
    let first = table.intern("count");
    table.intern("other");
    let second = table.intern("count");
    assert_eq!(first, second);
    assert_eq!(table.len(), 2);
}

#[test]
fn resolve_round_trips() {
    let mut table = IdentifierTable::new();
    let name = table.intern("main");
    assert_eq!(table.resolve(name), "main");
    assert_eq!(table.lookup("main"), Some(name));
    assert_eq!(table.lookup("missing"), None);
}

#[test]
fn try_resolve_unknown_id() {
    let table = IdentifierTable::new();
    assert!(table.is_empty());
    assert_eq!(table.try_resolve(Name::from_raw(7)), None);
}

#[test]
#[should_panic(expected = "was never interned")]
fn resolve_unknown_id_panics() {
    let table = IdentifierTable::new();
    let _ = table.resolve(Name::from_raw(0));
}

proptest! {
    #[test]
    fn interning_is_stable(words in proptest::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..40)) {
        let mut table = IdentifierTable::new();
        let first: Vec<Name> = words.iter().map(|w| table.intern(w)).collect();
        let len = table.len();
        let second: Vec<Name> = words.iter().map(|w| table.intern(w)).collect();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(table.len(), len);
        for (word, name) in words.iter().zip(&first) {
            prop_assert_eq!(table.resolve(*name), word.as_str());
        }
    }
}
