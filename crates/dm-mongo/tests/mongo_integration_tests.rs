//! Integration tests against a live MongoDB.
//!
//! Ignored by default. Run with a reachable server:
//!
//! ```text
//! DOCMIG_TEST_MONGO_URI=mongodb://localhost:27017 cargo test -p dm-mongo -- --ignored
//! ```

use dm_core::{ControlRecord, ControlStore, MigrateError, Orchestrator, RunOutcome};
use dm_mongo::{connect, MongoControlStore, ScriptDirectory};
use mongodb::bson::{doc, Document};
use mongodb::sync::Database;
use std::fs;

fn test_database(tag: &str) -> Database {
    let uri = std::env::var("DOCMIG_TEST_MONGO_URI")
        .expect("DOCMIG_TEST_MONGO_URI must point at a MongoDB server");
    let name = format!("docmig_test_{tag}_{}", std::process::id());
    let db = connect(&uri, Some(&name)).unwrap();
    db.drop(None).unwrap();
    db
}

#[test]
#[ignore = "requires a running MongoDB (DOCMIG_TEST_MONGO_URI)"]
fn control_record_round_trip() {
    let db = test_database("roundtrip");
    let store = MongoControlStore::new(&db);

    assert_eq!(store.load().unwrap(), None);
    store.save(ControlRecord::new(3, true)).unwrap();
    assert_eq!(store.load().unwrap(), Some(ControlRecord::new(3, true)));
    store.save(ControlRecord::new(4, false)).unwrap();
    assert_eq!(store.load().unwrap(), Some(ControlRecord::new(4, false)));

    let raw = db
        .collection::<Document>("migrations")
        .find_one(doc! { "_id": "control" }, None)
        .unwrap()
        .unwrap();
    assert_eq!(raw.get_i64("version").unwrap(), 4);
    assert!(!raw.get_bool("locked").unwrap());

    db.drop(None).unwrap();
}

#[test]
#[ignore = "requires a running MongoDB (DOCMIG_TEST_MONGO_URI)"]
fn scripts_apply_and_rerun_is_a_no_op() {
    let db = test_database("scripts");
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("migration_1.yaml"),
        "commands:\n  - insert: widgets\n    documents:\n      - { name: a }\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("migration_2.json"),
        r#"{"commands": [{"update": "widgets", "updates": [{"q": {}, "u": {"$set": {"seen": true}}, "multi": true}]}]}"#,
    )
    .unwrap();

    let registry = ScriptDirectory::new(dir.path()).load().unwrap();
    let store = MongoControlStore::new(&db);

    let outcome = Orchestrator::new(&registry, &store, &db).run().unwrap();
    assert_eq!(outcome.applied(), &[1, 2]);

    let widget = db
        .collection::<Document>("widgets")
        .find_one(doc! { "name": "a" }, None)
        .unwrap()
        .unwrap();
    assert!(widget.get_bool("seen").unwrap());

    let outcome = Orchestrator::new(&registry, &store, &db).run().unwrap();
    assert_eq!(outcome, RunOutcome::UpToDate { version: 2 });

    db.drop(None).unwrap();
}

#[test]
#[ignore = "requires a running MongoDB (DOCMIG_TEST_MONGO_URI)"]
fn failing_command_marks_rollback() {
    let db = test_database("failing");
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("migration_1.yaml"),
        "commands:\n  - ping: 1\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("migration_2.yaml"),
        "commands:\n  - definitelyNotACommand: 1\n",
    )
    .unwrap();

    let registry = ScriptDirectory::new(dir.path()).load().unwrap();
    let store = MongoControlStore::new(&db);

    let err = Orchestrator::new(&registry, &store, &db).run().unwrap_err();
    assert!(matches!(err, MigrateError::UnitApply { version: 2, .. }));
    assert_eq!(store.load().unwrap(), Some(ControlRecord::new(1, false)));

    db.drop(None).unwrap();
}
