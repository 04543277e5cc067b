//! Command-script migrations loaded from a directory.
//!
//! Every file whose name starts with `migration_` is a migration unit:
//! `migration_<version>.json`, `.yaml` or `.yml`, holding a list of database
//! commands that are sent with `runCommand` in order:
//!
//! ```yaml
//! description: Index users by email
//! commands:
//!   - createIndexes: users
//!     indexes:
//!       - key: { email: 1 }
//!         name: email_1
//!         unique: true
//! ```
//!
//! Files without the prefix are ignored. A prefixed file with an unsupported
//! extension or a malformed version stops discovery.

use anyhow::Context;
use dm_core::{
    parse_migration_name, MigrateError, MigrateResult, MigrationUnit, Registry, MIGRATION_PREFIX,
};
use mongodb::bson::Document;
use mongodb::sync::Database;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory scanned for migration scripts.
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Script file format, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    Json,
    Yaml,
}

impl ScriptFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(ScriptFormat::Json),
            "yaml" | "yml" => Some(ScriptFormat::Yaml),
            _ => None,
        }
    }
}

/// A migration unit made of database commands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandScript {
    /// Shown in logs next to the version
    #[serde(default)]
    pub description: Option<String>,

    /// Commands passed to `runCommand`, in order
    pub commands: Vec<Document>,
}

impl CommandScript {
    /// Parse script content in the given format.
    pub fn parse(content: &str, format: ScriptFormat) -> Result<Self, String> {
        let script: CommandScript = match format {
            ScriptFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
            ScriptFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
        };
        if script.commands.is_empty() {
            return Err("script has no commands".to_string());
        }
        if let Some(pos) = script.commands.iter().position(|c| c.is_empty()) {
            return Err(format!("command #{} is empty", pos + 1));
        }
        Ok(script)
    }
}

impl MigrationUnit<Database> for CommandScript {
    fn apply(&self, db: &Database) -> anyhow::Result<()> {
        for (idx, command) in self.commands.iter().enumerate() {
            let name = command.keys().next().map(String::as_str).unwrap_or_default();
            log::debug!("Running command #{} ({name})", idx + 1);
            db.run_command(command.clone(), None)
                .with_context(|| format!("command #{} ({name}) failed", idx + 1))?;
        }
        Ok(())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A script file found in the directory, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub version: u64,
    pub name: String,
    pub path: PathBuf,
    pub format: ScriptFormat,
}

/// Directory of `migration_<version>` scripts.
#[derive(Debug, Clone)]
pub struct ScriptDirectory {
    root: PathBuf,
}

impl ScriptDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List script files, sorted by version.
    ///
    /// Fails on the first malformed entry and on duplicate versions.
    pub fn scan(&self) -> MigrateResult<Vec<ScriptEntry>> {
        let read_dir = fs::read_dir(&self.root).map_err(|e| {
            MigrateError::discovery(format!(
                "cannot read migrations directory {}: {e}",
                self.root.display()
            ))
        })?;

        let mut entries: Vec<ScriptEntry> = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| {
                MigrateError::discovery(format!("cannot list {}: {e}", self.root.display()))
            })?;
            let path = dir_entry.path();
            let file_name = dir_entry.file_name().to_string_lossy().into_owned();
            if !file_name.starts_with(MIGRATION_PREFIX) {
                continue;
            }
            if !path.is_file() {
                log::debug!("Skipping non-file entry {}", path.display());
                continue;
            }
            entries.push(Self::classify(&path, &file_name)?);
        }

        entries.sort_by_key(|e| e.version);
        if let Some(pair) = entries.windows(2).find(|w| w[0].version == w[1].version) {
            return Err(MigrateError::DuplicateVersion {
                version: pair[0].version,
                first: pair[0].path.display().to_string(),
                second: pair[1].path.display().to_string(),
            });
        }
        Ok(entries)
    }

    fn classify(path: &Path, file_name: &str) -> MigrateResult<ScriptEntry> {
        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, ext),
            None => {
                return Err(MigrateError::discovery(format!(
                    "{} has no extension; expected .json, .yaml or .yml",
                    path.display()
                )))
            }
        };
        let format = ScriptFormat::from_extension(ext).ok_or_else(|| {
            MigrateError::discovery(format!(
                "{} has unsupported extension '.{ext}'; expected .json, .yaml or .yml",
                path.display()
            ))
        })?;
        let version = parse_migration_name(stem)?;
        Ok(ScriptEntry {
            version,
            name: stem.to_string(),
            path: path.to_path_buf(),
            format,
        })
    }

    /// Parse every script and build a registry.
    pub fn load(&self) -> MigrateResult<Registry<Database>> {
        let entries = self.scan()?;
        let mut builder = Registry::<Database>::builder();
        for entry in entries {
            let script = load_script(&entry)?;
            builder = builder.register_boxed(entry.version, entry.name, Box::new(script))?;
        }
        let registry = builder.build();
        log::debug!(
            "Discovered {} migration script(s) in {}",
            registry.len(),
            self.root.display()
        );
        Ok(registry)
    }
}

/// Read and parse a single script file.
pub fn load_script(entry: &ScriptEntry) -> MigrateResult<CommandScript> {
    let content = fs::read_to_string(&entry.path).map_err(|e| {
        MigrateError::discovery(format!("cannot read {}: {e}", entry.path.display()))
    })?;
    CommandScript::parse(&content, entry.format)
        .map_err(|e| MigrateError::discovery(format!("{}: {e}", entry.path.display())))
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
