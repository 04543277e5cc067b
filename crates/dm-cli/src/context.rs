//! Runtime context for CLI commands

use anyhow::{Context, Result};
use dm_core::Registry;
use dm_mongo::{connect, Database, MongoControlStore, ScriptDirectory};

use crate::cli::GlobalArgs;
use crate::config::Settings;

/// Resolved settings plus an open database handle and its control store
pub(crate) struct RuntimeContext {
    pub(crate) settings: Settings,
    pub(crate) db: Database,
    pub(crate) store: MongoControlStore,
}

impl RuntimeContext {
    /// Resolve settings and connect to the target database
    pub(crate) fn new(global: &GlobalArgs) -> Result<Self> {
        let settings = Settings::resolve(global)?;
        let db = connect(&settings.connection_string, settings.database.as_deref())
            .context("Failed to open MongoDB client")?;
        let store = MongoControlStore::new(&db);
        Ok(Self {
            settings,
            db,
            store,
        })
    }

    /// Load the migration scripts named by the settings
    pub(crate) fn load_registry(&self) -> Result<Registry<Database>> {
        let dir = ScriptDirectory::new(&self.settings.migrations_dir);
        dir.load().with_context(|| {
            format!(
                "Failed to load migrations from {}",
                self.settings.migrations_dir.display()
            )
        })
    }
}
