//! Migration orchestration.
//!
//! [`Orchestrator::run`] reads the control record, diffs it against the
//! source, and applies pending units one at a time in ascending order,
//! persisting the control record after each success:
//!
//! ```text
//! Idle -> Checking -> LockedRunning -> (CommittingStep)* -> UnlockedDone
//!            |                  \________________________> FailedRollbackMark
//!            \-> UpToDate
//! ```
//!
//! A crash after a step commit resumes from that step on the next run. A
//! failing unit rolls the record back to the last known-good version and
//! clears the lock before the error is returned. A process killed mid-run
//! leaves the lock set; it has to be cleared out-of-band.

use crate::control::{read_control, write_control, ControlRecord, ControlStore};
use crate::error::{MigrateError, MigrateResult};
use crate::observer::{NoopObserver, RunObserver};
use crate::source::{Discovered, MigrationSource};
use std::fmt;

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Checking,
    /// Recorded version is current (or ahead); nothing was written.
    UpToDate,
    LockedRunning,
    CommittingStep { version: u64 },
    UnlockedDone,
    FailedRollbackMark,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Checking => write!(f, "checking"),
            RunState::UpToDate => write!(f, "up-to-date"),
            RunState::LockedRunning => write!(f, "locked-running"),
            RunState::CommittingStep { version } => write!(f, "committing-step({version})"),
            RunState::UnlockedDone => write!(f, "unlocked-done"),
            RunState::FailedRollbackMark => write!(f, "failed-rollback-mark"),
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No unit was applied and no write happened.
    UpToDate { version: u64 },
    /// Units in `applied` ran, in order; the record now reads `{to, false}`.
    Migrated {
        from: u64,
        to: u64,
        applied: Vec<u64>,
    },
}

impl RunOutcome {
    /// Version recorded after the run.
    pub fn version(&self) -> u64 {
        match self {
            RunOutcome::UpToDate { version } => *version,
            RunOutcome::Migrated { to, .. } => *to,
        }
    }

    pub fn applied(&self) -> &[u64] {
        match self {
            RunOutcome::UpToDate { .. } => &[],
            RunOutcome::Migrated { applied, .. } => applied,
        }
    }
}

/// Drives one migration run against a database handle `D`.
pub struct Orchestrator<'a, D: ?Sized> {
    source: &'a dyn MigrationSource<D>,
    store: &'a dyn ControlStore,
    db: &'a D,
    observer: &'a dyn RunObserver,
    state: RunState,
}

impl<'a, D: ?Sized> Orchestrator<'a, D> {
    pub fn new(
        source: &'a dyn MigrationSource<D>,
        store: &'a dyn ControlStore,
        db: &'a D,
    ) -> Self {
        Self {
            source,
            store,
            db,
            observer: &NoopObserver,
            state: RunState::Idle,
        }
    }

    /// Report progress to `observer` instead of discarding it.
    pub fn with_observer(mut self, observer: &'a dyn RunObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Bring the database up to the latest known version.
    ///
    /// Store errors propagate as-is. A unit failure is returned after the
    /// rollback mark has been written.
    pub fn run(&mut self) -> MigrateResult<RunOutcome> {
        self.transition(RunState::Checking);
        self.observer.check_started();

        let discovered = self.source.discover()?;
        let latest = discovered.latest();
        let current = read_control(self.store)?;

        if current.version >= latest {
            if current.version > latest {
                self.observer.ahead_of_registry(current.version, latest);
            } else {
                self.observer.up_to_date(latest);
            }
            self.transition(RunState::UpToDate);
            return Ok(RunOutcome::UpToDate {
                version: current.version,
            });
        }

        self.observer.range_started(current.version, latest);
        // No compare-and-swap: a concurrent run that read the record before
        // this write will also proceed.
        write_control(self.store, current.version, true)?;
        self.transition(RunState::LockedRunning);

        let mut applied = Vec::new();
        let mut last_good = current.version;
        for &version in discovered.pending_after(current.version) {
            if let Err(err) = self.apply_unit(version) {
                return Err(self.mark_rollback(version, last_good, err));
            }
            self.observer.unit_finished(version);

            self.transition(RunState::CommittingStep { version });
            write_control(self.store, version, true)?;
            last_good = version;
            applied.push(version);
        }

        write_control(self.store, latest, false)?;
        self.transition(RunState::UnlockedDone);
        self.observer.completed(latest);

        Ok(RunOutcome::Migrated {
            from: current.version,
            to: latest,
            applied,
        })
    }

    fn apply_unit(&self, version: u64) -> MigrateResult<()> {
        let unit = self.source.unit(version).ok_or_else(|| {
            MigrateError::discovery(format!(
                "version {version} was discovered but no unit is registered for it"
            ))
        })?;
        self.observer.unit_started(version, unit.description());
        unit.apply(self.db)
            .map_err(|source| MigrateError::UnitApply {
                version,
                source: source.into(),
            })
    }

    /// Persist `{last_good, false}` after `version` failed and hand back the
    /// error to return. A failing rollback write takes precedence.
    fn mark_rollback(&mut self, version: u64, last_good: u64, err: MigrateError) -> MigrateError {
        self.observer.unit_failed(version, &err);
        self.transition(RunState::FailedRollbackMark);
        if let Err(store_err) = write_control(self.store, last_good, false) {
            return store_err;
        }
        self.observer.rollback_marked(last_good);
        err
    }

    fn transition(&mut self, next: RunState) {
        let prev = std::mem::replace(&mut self.state, next);
        self.observer.state_changed(prev, next);
    }
}

/// Run with a [`crate::LogObserver`].
pub fn run_migrations<D: ?Sized>(
    source: &dyn MigrationSource<D>,
    store: &dyn ControlStore,
    db: &D,
) -> MigrateResult<RunOutcome> {
    Orchestrator::new(source, store, db)
        .with_observer(&crate::LogObserver)
        .run()
}

/// Read-only view of where a database stands relative to a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Raw record; `None` if nothing was ever written.
    pub record: Option<ControlRecord>,
    pub discovered: Discovered,
}

impl Status {
    pub fn current_version(&self) -> u64 {
        self.record.map(|r| r.version).unwrap_or(0)
    }

    pub fn locked(&self) -> bool {
        self.record.is_some_and(|r| r.locked)
    }

    /// Versions a run would apply (ignoring the lock).
    pub fn pending(&self) -> &[u64] {
        self.discovered.pending_after(self.current_version())
    }
}

/// Inspect the control record without the lock check and without writing.
pub fn inspect<D: ?Sized>(
    source: &dyn MigrationSource<D>,
    store: &dyn ControlStore,
) -> MigrateResult<Status> {
    Ok(Status {
        discovered: source.discover()?,
        record: store.load()?,
    })
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
