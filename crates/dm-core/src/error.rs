//! Error types for dm-core

use thiserror::Error;

/// Errors raised while discovering, tracking, or applying migrations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// DM001: Control record is locked by a running (or crashed) process
    #[error(
        "[DM001] Cannot migrate, control is locked at version {version}. Perhaps another server/process is executing migrations?"
    )]
    Locked { version: u64 },

    /// DM002: Malformed migration registry entry
    #[error("[DM002] Migration discovery failed: {message}")]
    Discovery { message: String },

    /// DM003: Two registry entries claim the same version
    #[error("[DM003] Duplicate migration version {version}: {first} and {second}")]
    DuplicateVersion {
        version: u64,
        first: String,
        second: String,
    },

    /// DM004: Version outside the accepted range
    #[error("[DM004] Invalid migration version in {entry}: versions must be positive")]
    InvalidVersion { entry: String },

    /// DM005: A migration unit raised while being applied
    #[error("[DM005] Migration {version} failed: {source}")]
    UnitApply {
        version: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// DM006: Reading or writing the control record failed
    #[error("[DM006] Control record {operation} failed: {message}")]
    StoreIo {
        operation: &'static str,
        message: String,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// Shorthand for a [`MigrateError::Discovery`] with a formatted message.
    pub fn discovery(message: impl Into<String>) -> Self {
        MigrateError::Discovery {
            message: message.into(),
        }
    }

    /// Shorthand for a [`MigrateError::StoreIo`] wrapping any displayable cause.
    pub fn store_io(operation: &'static str, cause: impl std::fmt::Display) -> Self {
        MigrateError::StoreIo {
            operation,
            message: cause.to_string(),
        }
    }

    /// Stable error code, e.g. `"DM001"`.
    pub fn code(&self) -> &'static str {
        match self {
            MigrateError::Locked { .. } => "DM001",
            MigrateError::Discovery { .. } => "DM002",
            MigrateError::DuplicateVersion { .. } => "DM003",
            MigrateError::InvalidVersion { .. } => "DM004",
            MigrateError::UnitApply { .. } => "DM005",
            MigrateError::StoreIo { .. } => "DM006",
        }
    }
}
