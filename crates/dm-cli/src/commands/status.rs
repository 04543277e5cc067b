//! Status command implementation

use anyhow::Result;
use dm_core::{inspect, Status};
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::RuntimeContext;

/// JSON shape of `docmig status -o json`
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    database: &'a str,
    initialized: bool,
    version: u64,
    locked: bool,
    latest: u64,
    pending: &'a [u64],
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let registry = ctx.load_registry()?;
    let status = inspect(&registry, &ctx.store)?;

    match args.output {
        StatusOutput::Text => print!("{}", render_text(ctx.db.name(), &status)),
        StatusOutput::Json => println!("{}", render_json(ctx.db.name(), &status)?),
    }
    Ok(())
}

fn render_text(database: &str, status: &Status) -> String {
    let recorded = match status.record {
        None => "none (no migrations applied)".to_string(),
        Some(r) if r.locked => format!("{} (LOCKED)", r.version),
        Some(r) => r.version.to_string(),
    };
    let pending = status.pending();
    let pending = if pending.is_empty() {
        "none".to_string()
    } else {
        pending
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = String::new();
    out.push_str(&format!("Database:          {database}\n"));
    out.push_str(&format!("Recorded version:  {recorded}\n"));
    out.push_str(&format!("Latest migration:  {}\n", status.discovered.latest()));
    out.push_str(&format!("Pending:           {pending}\n"));
    if status.locked() {
        out.push_str(
            "\nThe control record is locked. If no migration run is in progress, \
             clear it with `docmig unlock`.\n",
        );
    }
    out
}

fn render_json(database: &str, status: &Status) -> Result<String> {
    let report = StatusReport {
        database,
        initialized: status.record.is_some(),
        version: status.current_version(),
        locked: status.locked(),
        latest: status.discovered.latest(),
        pending: status.pending(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
