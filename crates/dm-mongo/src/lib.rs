//! dm-mongo - MongoDB backend for docmig
//!
//! Provides the [`MongoControlStore`] control record store, a connection
//! helper, and [`ScriptDirectory`], which turns a directory of
//! `migration_<version>` command scripts into a migration registry.
//! All access goes through the blocking `mongodb::sync` API.

pub mod script;
pub mod store;

pub use script::{CommandScript, ScriptDirectory, ScriptEntry, ScriptFormat, DEFAULT_MIGRATIONS_DIR};
pub use store::{
    connect, ControlDocument, MongoControlStore, CONTROL_COLLECTION, DEFAULT_CONNECTION_STRING,
    DEFAULT_DATABASE,
};

/// Blocking MongoDB database handle that migration units receive.
pub use mongodb::sync::Database;
