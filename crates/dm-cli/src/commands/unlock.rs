//! Unlock command implementation
//!
//! Manual recovery for a control record left locked by a run that was killed
//! mid-way. Nothing checks whether another run is actually in progress.

use anyhow::Result;
use dm_core::{write_control, ControlRecord, ControlStore};

use crate::cli::{GlobalArgs, UnlockArgs};
use crate::context::RuntimeContext;

/// Execute the unlock command
pub(crate) fn execute(args: &UnlockArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    match unlock(&ctx.store, args.set_version)? {
        Some(record) => log::info!(
            "Control record on '{}' unlocked at version {}",
            ctx.db.name(),
            record.version
        ),
        None => log::warn!("Control record on '{}' is not locked", ctx.db.name()),
    }
    Ok(())
}

/// Clear the lock, optionally overwriting the version.
///
/// Returns the written record, or `None` when the record was already unlocked
/// and no version override was requested.
fn unlock(store: &dyn ControlStore, set_version: Option<u64>) -> Result<Option<ControlRecord>> {
    let current = store.load()?.unwrap_or_default();
    if !current.locked && set_version.is_none() {
        return Ok(None);
    }
    let version = set_version.unwrap_or(current.version);
    if version != current.version {
        log::warn!(
            "Rewriting recorded version from {} to {version}",
            current.version
        );
    }
    write_control(store, version, false)?;
    Ok(Some(ControlRecord::new(version, false)))
}

#[cfg(test)]
#[path = "unlock_test.rs"]
mod tests;
