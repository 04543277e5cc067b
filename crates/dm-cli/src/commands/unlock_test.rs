use super::*;
use dm_core::MemoryControlStore;

#[test]
fn test_unlock_clears_lock_and_keeps_version() {
    let store = MemoryControlStore::with_record(ControlRecord::new(4, true));

    let written = unlock(&store, None).unwrap();

    assert_eq!(written, Some(ControlRecord::new(4, false)));
    assert_eq!(store.record(), Some(ControlRecord::new(4, false)));
}

#[test]
fn test_unlock_noop_when_not_locked() {
    let store = MemoryControlStore::with_record(ControlRecord::new(2, false));

    assert_eq!(unlock(&store, None).unwrap(), None);
    assert!(store.writes().is_empty());
}

#[test]
fn test_unlock_noop_on_missing_record() {
    let store = MemoryControlStore::new();

    assert_eq!(unlock(&store, None).unwrap(), None);
    assert!(store.record().is_none());
}

#[test]
fn test_unlock_with_version_override() {
    let store = MemoryControlStore::with_record(ControlRecord::new(5, true));

    let written = unlock(&store, Some(3)).unwrap();

    assert_eq!(written, Some(ControlRecord::new(3, false)));
    assert_eq!(store.writes(), vec![ControlRecord::new(3, false)]);
}

#[test]
fn test_set_version_on_unlocked_record_still_writes() {
    let store = MemoryControlStore::new();

    unlock(&store, Some(7)).unwrap();

    assert_eq!(store.record(), Some(ControlRecord::new(7, false)));
}
