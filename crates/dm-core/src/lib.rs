//! dm-core - versioned migration orchestration for docmig
//!
//! Discovers migration units, compares them with the persisted control
//! record, and applies pending units in ascending version order with a
//! per-step commit of progress. Storage backends implement [`ControlStore`];
//! the MongoDB one lives in `dm-mongo`.

pub mod control;
pub mod error;
pub mod memory;
pub mod observer;
pub mod orchestrator;
pub mod source;
pub mod unit;

pub use control::{read_control, write_control, ControlRecord, ControlStore, CONTROL_ID};
pub use error::{MigrateError, MigrateResult};
pub use memory::MemoryControlStore;
pub use observer::{LogObserver, NoopObserver, RunObserver};
pub use orchestrator::{inspect, run_migrations, Orchestrator, RunOutcome, RunState, Status};
pub use source::{
    parse_migration_name, Discovered, MigrationSource, Registry, RegistryBuilder, MIGRATION_PREFIX,
};
pub use unit::{Described, MigrationUnit};
