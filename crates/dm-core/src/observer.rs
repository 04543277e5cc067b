//! Progress reporting for orchestration runs.
//!
//! The orchestrator never logs run progress directly; it reports to a
//! [`RunObserver`]. Binaries pass a [`LogObserver`], tests pass a recorder.

use crate::error::MigrateError;
use crate::orchestrator::RunState;

/// Receives orchestration events. All methods default to no-ops.
pub trait RunObserver {
    fn check_started(&self) {}

    /// The recorded version already matches the latest known version.
    fn up_to_date(&self, _version: u64) {}

    /// The recorded version is higher than anything the source knows about.
    fn ahead_of_registry(&self, _current: u64, _latest: u64) {}

    fn range_started(&self, _from: u64, _to: u64) {}

    fn unit_started(&self, _version: u64, _description: Option<&str>) {}

    fn unit_finished(&self, _version: u64) {}

    fn unit_failed(&self, _version: u64, _error: &MigrateError) {}

    /// The rollback mark was persisted after a failure.
    fn rollback_marked(&self, _version: u64) {}

    fn completed(&self, _version: u64) {}

    fn state_changed(&self, _from: RunState, _to: RunState) {}
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that writes events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn check_started(&self) {
        log::info!("Checking if migrations need to be run...");
    }

    fn up_to_date(&self, version: u64) {
        log::info!("Not migrating, already at version {version}");
    }

    fn ahead_of_registry(&self, current: u64, latest: u64) {
        log::warn!(
            "Not migrating, control record is at version {current} but the latest known migration is {latest}"
        );
    }

    fn range_started(&self, from: u64, to: u64) {
        log::info!("Starting migrations from version {from} to {to}");
    }

    fn unit_started(&self, version: u64, description: Option<&str>) {
        match description {
            Some(d) => log::info!("Migrating to version {version} ({d})"),
            None => log::info!("Migrating to version {version}"),
        }
    }

    fn unit_finished(&self, version: u64) {
        log::info!("Migration {version} finished");
    }

    fn unit_failed(&self, version: u64, error: &MigrateError) {
        log::error!("Migration {version} failed: {error}");
    }

    fn rollback_marked(&self, version: u64) {
        log::warn!("Control record rolled back to version {version} and unlocked");
    }

    fn completed(&self, _version: u64) {
        log::info!("Done migrating.");
    }

    fn state_changed(&self, from: RunState, to: RunState) {
        log::debug!("Orchestrator state {from} -> {to}");
    }
}
