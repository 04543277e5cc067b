//! Migration units: one versioned transformation of the target database.

/// A single migration step applied against a database handle `D`.
///
/// The version is not part of the unit; it is the key the unit is
/// registered under (see [`crate::Registry`]). Units must raise on failure.
/// Partial work done before raising is not undone.
pub trait MigrationUnit<D: ?Sized> {
    /// Apply the transformation.
    fn apply(&self, db: &D) -> anyhow::Result<()>;

    /// Human-readable summary for logs.
    fn description(&self) -> Option<&str> {
        None
    }
}

impl<D, F> MigrationUnit<D> for F
where
    D: ?Sized,
    F: Fn(&D) -> anyhow::Result<()>,
{
    fn apply(&self, db: &D) -> anyhow::Result<()> {
        self(db)
    }
}

/// A unit paired with a description.
pub struct Described<U> {
    description: String,
    unit: U,
}

impl<U> Described<U> {
    pub fn new(description: impl Into<String>, unit: U) -> Self {
        Self {
            description: description.into(),
            unit,
        }
    }
}

impl<D: ?Sized, U: MigrationUnit<D>> MigrationUnit<D> for Described<U> {
    fn apply(&self, db: &D) -> anyhow::Result<()> {
        self.unit.apply(db)
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }
}
