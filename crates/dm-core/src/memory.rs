//! In-process control store.

use crate::control::{ControlRecord, ControlStore};
use crate::error::{MigrateError, MigrateResult};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    record: Option<ControlRecord>,
    writes: Vec<ControlRecord>,
    reads: usize,
    fail_on_write: Option<usize>,
}

/// [`ControlStore`] kept in memory, with a full write history.
///
/// Used for dry runs and tests. Mutex-guarded so it can be shared by
/// reference.
#[derive(Debug, Default)]
pub struct MemoryControlStore {
    state: Mutex<State>,
}

impl MemoryControlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record, as if a previous run had written it.
    ///
    /// The seed does not count as a write.
    pub fn with_record(record: ControlRecord) -> Self {
        let store = Self::default();
        if let Ok(mut state) = store.state.lock() {
            state.record = Some(record);
        }
        store
    }

    /// Make the `n`-th write from now (1-based) fail with a store error.
    pub fn fail_on_write(&self, n: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_on_write = Some(state.writes.len() + n);
        }
    }

    /// Current record, bypassing lock checks.
    pub fn record(&self) -> Option<ControlRecord> {
        self.state.lock().ok().and_then(|s| s.record)
    }

    /// Every record written so far, oldest first.
    pub fn writes(&self) -> Vec<ControlRecord> {
        self.state
            .lock()
            .map(|s| s.writes.clone())
            .unwrap_or_default()
    }

    pub fn read_count(&self) -> usize {
        self.state.lock().map(|s| s.reads).unwrap_or_default()
    }

    fn lock(&self) -> MigrateResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| MigrateError::store_io("lock", format!("mutex poisoned: {e}")))
    }
}

impl ControlStore for MemoryControlStore {
    fn load(&self) -> MigrateResult<Option<ControlRecord>> {
        let mut state = self.lock()?;
        state.reads += 1;
        Ok(state.record)
    }

    fn save(&self, record: ControlRecord) -> MigrateResult<()> {
        let mut state = self.lock()?;
        if state.fail_on_write == Some(state.writes.len() + 1) {
            state.fail_on_write = None;
            return Err(MigrateError::store_io("write", "injected write failure"));
        }
        state.writes.push(record);
        state.record = Some(record);
        Ok(())
    }
}
