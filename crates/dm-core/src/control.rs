//! Control record access.
//!
//! The control record is a singleton persisted next to the migrated data. It
//! stores the highest fully applied version and an advisory `locked` flag.
//! The lock is check-then-set: nothing stops two processes that both read an
//! unlocked record from racing to write `locked = true`.

use crate::error::{MigrateError, MigrateResult};

/// Fixed identifier of the control record.
pub const CONTROL_ID: &str = "control";

/// Persisted orchestration state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlRecord {
    /// Highest successfully applied version; 0 when nothing has run.
    pub version: u64,
    /// Set while a run is applying migrations.
    pub locked: bool,
}

impl ControlRecord {
    pub fn new(version: u64, locked: bool) -> Self {
        Self { version, locked }
    }
}

/// Persistence seam for the control record.
///
/// Implementations only move bytes; the locking protocol lives in
/// [`read_control`], [`write_control`] and the orchestrator.
pub trait ControlStore {
    /// Fetch the record, or `None` if it was never written.
    fn load(&self) -> MigrateResult<Option<ControlRecord>>;

    /// Upsert the record.
    fn save(&self, record: ControlRecord) -> MigrateResult<()>;
}

impl<S: ControlStore + ?Sized> ControlStore for &S {
    fn load(&self) -> MigrateResult<Option<ControlRecord>> {
        (**self).load()
    }

    fn save(&self, record: ControlRecord) -> MigrateResult<()> {
        (**self).save(record)
    }
}

/// Read the control record for a new run.
///
/// A missing record reads as `{version: 0, locked: false}`. A locked record
/// fails with [`MigrateError::Locked`]; a run in progress and a run that
/// crashed while holding the lock look the same.
pub fn read_control(store: &dyn ControlStore) -> MigrateResult<ControlRecord> {
    let record = store.load()?.unwrap_or_default();
    if record.locked {
        return Err(MigrateError::Locked {
            version: record.version,
        });
    }
    Ok(record)
}

/// Upsert `{version, locked}`.
pub fn write_control(store: &dyn ControlStore, version: u64, locked: bool) -> MigrateResult<()> {
    log::debug!("Writing control record: version={version}, locked={locked}");
    store.save(ControlRecord::new(version, locked))
}

#[cfg(test)]
#[path = "control_test.rs"]
mod tests;
