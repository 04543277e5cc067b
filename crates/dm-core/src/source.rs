//! Migration discovery.
//!
//! A [`MigrationSource`] reports which versions exist and hands out the unit
//! registered for each. [`Registry`] is the standard source: an ordered map
//! from version to unit, filled through [`RegistryBuilder`].

use crate::error::{MigrateError, MigrateResult};
use crate::unit::MigrationUnit;
use std::collections::BTreeMap;
use std::fmt;

/// Naming convention prefix for registry entries (`migration_<version>`).
pub const MIGRATION_PREFIX: &str = "migration_";

/// Result of discovery: the sorted set of known versions and the latest one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    versions: Vec<u64>,
}

impl Discovered {
    /// Sort and validate a set of versions.
    ///
    /// Rejects zero and duplicates; listing order does not matter.
    pub fn new(versions: impl IntoIterator<Item = u64>) -> MigrateResult<Self> {
        let mut versions: Vec<u64> = versions.into_iter().collect();
        versions.sort_unstable();
        if versions.first() == Some(&0) {
            return Err(MigrateError::InvalidVersion {
                entry: format!("{MIGRATION_PREFIX}0"),
            });
        }
        if let Some(pair) = versions.windows(2).find(|w| w[0] == w[1]) {
            return Err(MigrateError::DuplicateVersion {
                version: pair[0],
                first: format!("{MIGRATION_PREFIX}{}", pair[0]),
                second: format!("{MIGRATION_PREFIX}{}", pair[1]),
            });
        }
        Ok(Self { versions })
    }

    /// Versions in ascending order.
    pub fn versions(&self) -> &[u64] {
        &self.versions
    }

    /// Highest known version, or 0 when nothing is registered.
    pub fn latest(&self) -> u64 {
        self.versions.last().copied().unwrap_or(0)
    }

    /// Versions strictly greater than `current`, ascending.
    pub fn pending_after(&self, current: u64) -> &[u64] {
        let start = self.versions.partition_point(|v| *v <= current);
        &self.versions[start..]
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Anything that can enumerate migration units for a database handle `D`.
pub trait MigrationSource<D: ?Sized> {
    /// List every known version.
    fn discover(&self) -> MigrateResult<Discovered>;

    /// Unit registered for `version`, if any.
    fn unit(&self, version: u64) -> Option<&dyn MigrationUnit<D>>;
}

/// Parse a `migration_<version>` identifier.
///
/// The version must be a positive integer; anything else after the prefix is
/// a discovery error rather than a skipped entry.
pub fn parse_migration_name(name: &str) -> MigrateResult<u64> {
    let digits = name.strip_prefix(MIGRATION_PREFIX).ok_or_else(|| {
        MigrateError::discovery(format!(
            "'{name}' does not follow the {MIGRATION_PREFIX}<version> naming convention"
        ))
    })?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MigrateError::discovery(format!(
            "'{name}' has a non-numeric version '{digits}'"
        )));
    }
    let version: u64 = digits.parse().map_err(|e| {
        MigrateError::discovery(format!("'{name}' has an unparseable version: {e}"))
    })?;
    if version == 0 {
        return Err(MigrateError::InvalidVersion {
            entry: name.to_string(),
        });
    }
    Ok(version)
}

struct Entry<D: ?Sized> {
    name: String,
    unit: Box<dyn MigrationUnit<D>>,
}

/// Ordered map from version to migration unit.
pub struct Registry<D: ?Sized> {
    entries: BTreeMap<u64, Entry<D>>,
}

impl<D: ?Sized> Registry<D> {
    pub fn builder() -> RegistryBuilder<D> {
        RegistryBuilder {
            entries: BTreeMap::new(),
        }
    }

    /// An empty registry; running against it is always a no-op.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name the unit was registered under.
    pub fn entry_name(&self, version: u64) -> Option<&str> {
        self.entries.get(&version).map(|e| e.name.as_str())
    }
}

impl<D: ?Sized> MigrationSource<D> for Registry<D> {
    fn discover(&self) -> MigrateResult<Discovered> {
        // BTreeMap keys are already sorted and unique.
        Ok(Discovered {
            versions: self.entries.keys().copied().collect(),
        })
    }

    fn unit(&self, version: u64) -> Option<&dyn MigrationUnit<D>> {
        let entry = self.entries.get(&version)?;
        Some(entry.unit.as_ref())
    }
}

impl<D: ?Sized> fmt::Debug for Registry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(v, e)| (v, &e.name)))
            .finish()
    }
}

/// Builder for [`Registry`]. Validation happens at registration time so that
/// a built registry is always well-formed.
pub struct RegistryBuilder<D: ?Sized> {
    entries: BTreeMap<u64, Entry<D>>,
}

impl<D: ?Sized> RegistryBuilder<D> {
    /// Register `unit` under `version`.
    pub fn register<U>(self, version: u64, unit: U) -> MigrateResult<Self>
    where
        U: MigrationUnit<D> + 'static,
    {
        let name = format!("{MIGRATION_PREFIX}{version}");
        self.insert(version, name, Box::new(unit))
    }

    /// Register `unit` under the version encoded in `name`
    /// (`migration_<version>`).
    pub fn register_named<U>(self, name: &str, unit: U) -> MigrateResult<Self>
    where
        U: MigrationUnit<D> + 'static,
    {
        let version = parse_migration_name(name)?;
        self.insert(version, name.to_string(), Box::new(unit))
    }

    /// Register an already boxed unit under an explicit entry name.
    pub fn register_boxed(
        self,
        version: u64,
        name: impl Into<String>,
        unit: Box<dyn MigrationUnit<D>>,
    ) -> MigrateResult<Self> {
        self.insert(version, name.into(), unit)
    }

    fn insert(
        mut self,
        version: u64,
        name: String,
        unit: Box<dyn MigrationUnit<D>>,
    ) -> MigrateResult<Self> {
        if version == 0 {
            return Err(MigrateError::InvalidVersion { entry: name });
        }
        if let Some(existing) = self.entries.get(&version) {
            return Err(MigrateError::DuplicateVersion {
                version,
                first: existing.name.clone(),
                second: name,
            });
        }
        self.entries.insert(version, Entry { name, unit });
        Ok(self)
    }

    pub fn build(self) -> Registry<D> {
        Registry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
