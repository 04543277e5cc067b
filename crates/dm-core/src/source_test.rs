use super::*;

struct NoDb;

fn noop(_: &NoDb) -> anyhow::Result<()> {
    Ok(())
}

// ── Discovered ─────────────────────────────────────────────────────────

#[test]
fn discovered_sorts_versions() {
    let d = Discovered::new([3, 1, 2]).unwrap();
    assert_eq!(d.versions(), &[1, 2, 3]);
    assert_eq!(d.latest(), 3);
}

#[test]
fn discovered_empty_latest_is_zero() {
    let d = Discovered::new([]).unwrap();
    assert!(d.is_empty());
    assert_eq!(d.latest(), 0);
    assert!(d.pending_after(0).is_empty());
}

#[test]
fn discovered_rejects_duplicates() {
    let err = Discovered::new([4, 2, 4]).unwrap_err();
    assert!(matches!(err, MigrateError::DuplicateVersion { version: 4, .. }));
}

#[test]
fn discovered_rejects_zero() {
    let err = Discovered::new([0, 1]).unwrap_err();
    assert!(matches!(err, MigrateError::InvalidVersion { .. }));
}

#[test]
fn pending_after_skips_applied_versions() {
    let d = Discovered::new([1, 2, 5, 9]).unwrap();
    assert_eq!(d.pending_after(0), &[1, 2, 5, 9]);
    assert_eq!(d.pending_after(2), &[5, 9]);
    assert_eq!(d.pending_after(3), &[5, 9]);
    assert!(d.pending_after(9).is_empty());
    assert!(d.pending_after(12).is_empty());
}

// ── Name parsing ───────────────────────────────────────────────────────

#[test]
fn parse_migration_name_accepts_convention() {
    assert_eq!(parse_migration_name("migration_1").unwrap(), 1);
    assert_eq!(parse_migration_name("migration_042").unwrap(), 42);
}

#[test]
fn parse_migration_name_rejects_malformed() {
    for name in ["migration_", "migration_x", "migration_1a", "migration_-3", "mig_1"] {
        let err = parse_migration_name(name).unwrap_err();
        assert!(
            matches!(err, MigrateError::Discovery { .. }),
            "expected discovery error for {name}, got {err:?}"
        );
    }
}

#[test]
fn parse_migration_name_rejects_zero() {
    let err = parse_migration_name("migration_0").unwrap_err();
    assert_eq!(err.code(), "DM004");
}

// ── Registry ───────────────────────────────────────────────────────────

#[test]
fn registry_discovers_in_ascending_order() {
    let registry = Registry::<NoDb>::builder()
        .register(10, noop)
        .unwrap()
        .register(2, noop)
        .unwrap()
        .register_named("migration_7", noop)
        .unwrap()
        .build();

    let discovered = registry.discover().unwrap();
    assert_eq!(discovered.versions(), &[2, 7, 10]);
    assert_eq!(discovered.latest(), 10);
    assert!(registry.unit(7).is_some());
    assert!(registry.unit(3).is_none());
    assert_eq!(registry.entry_name(7), Some("migration_7"));
}

#[test]
fn registry_rejects_duplicate_version() {
    let err = Registry::<NoDb>::builder()
        .register_named("migration_3", noop)
        .unwrap()
        .register_named("migration_03", noop)
        .err()
        .unwrap();
    match err {
        MigrateError::DuplicateVersion {
            version,
            first,
            second,
        } => {
            assert_eq!(version, 3);
            assert_eq!(first, "migration_3");
            assert_eq!(second, "migration_03");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn registry_rejects_version_zero() {
    let err = Registry::<NoDb>::builder().register(0, noop).err().unwrap();
    assert!(matches!(err, MigrateError::InvalidVersion { .. }));
}

#[test]
fn empty_registry_discovers_nothing() {
    let registry = Registry::<NoDb>::empty();
    assert!(registry.is_empty());
    assert_eq!(registry.discover().unwrap().latest(), 0);
}

#[test]
fn described_unit_reports_description() {
    let registry = Registry::<NoDb>::builder()
        .register(1, crate::Described::new("create indexes", noop))
        .unwrap()
        .build();
    let unit = registry.unit(1).unwrap();
    assert_eq!(unit.description(), Some("create indexes"));
    unit.apply(&NoDb).unwrap();
}
