//! Run command implementation

use anyhow::Result;
use dm_core::{LogObserver, Orchestrator, RunOutcome};

use crate::cli::{GlobalArgs, RunArgs};
use crate::context::RuntimeContext;

/// Execute the run command
pub(crate) fn execute(_args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let registry = ctx.load_registry()?;

    let outcome = Orchestrator::new(&registry, &ctx.store, &ctx.db)
        .with_observer(&LogObserver)
        .run()?;

    if let RunOutcome::Migrated { from, to, applied } = &outcome {
        log::debug!(
            "Applied {} migration(s) on '{}': {from} -> {to}",
            applied.len(),
            ctx.db.name()
        );
    }
    Ok(())
}
