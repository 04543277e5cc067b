//! MongoDB-backed control record.
//!
//! The record lives in the `migrations` collection of the target database
//! under `_id: "control"`, with two fields: `version` and `locked`.

use dm_core::{ControlRecord, ControlStore, MigrateError, MigrateResult, CONTROL_ID};
use mongodb::bson::{doc, Bson};
use mongodb::options::UpdateOptions;
use mongodb::sync::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

/// Connection string used when none is configured.
pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://localhost:27017";

/// Database used when neither the configuration nor the connection string
/// names one.
pub const DEFAULT_DATABASE: &str = "docmig";

/// Collection holding the control record.
pub const CONTROL_COLLECTION: &str = "migrations";

/// On-disk shape of the control record.
///
/// `version` is written as int64. Reads also take int32 from older tools and
/// whole-number doubles from records patched in the legacy shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default = "zero_version")]
    pub version: Bson,
    #[serde(default)]
    pub locked: bool,
}

fn zero_version() -> Bson {
    Bson::Int64(0)
}

impl ControlDocument {
    pub fn from_record(record: ControlRecord) -> MigrateResult<Self> {
        let version = i64::try_from(record.version).map_err(|_| {
            MigrateError::store_io(
                "write",
                format!("version {} does not fit in int64", record.version),
            )
        })?;
        Ok(Self {
            id: CONTROL_ID.to_string(),
            version: Bson::Int64(version),
            locked: record.locked,
        })
    }

    pub fn into_record(self) -> MigrateResult<ControlRecord> {
        let version = version_from_bson(&self.version).ok_or_else(|| {
            MigrateError::store_io(
                "read",
                format!("control record has an invalid version {}", self.version),
            )
        })?;
        Ok(ControlRecord::new(version, self.locked))
    }
}

/// Non-negative integer, or a double holding one.
fn version_from_bson(value: &Bson) -> Option<u64> {
    match *value {
        Bson::Int32(v) => u64::try_from(v).ok(),
        Bson::Int64(v) => u64::try_from(v).ok(),
        Bson::Double(v) if v.fract() == 0.0 && (0.0..=i64::MAX as f64).contains(&v) => {
            Some(v as u64)
        }
        _ => None,
    }
}

/// Open a client for `uri` and select the target database.
///
/// `database` wins over the default database in the connection string, which
/// wins over [`DEFAULT_DATABASE`]. The driver connects lazily, so an
/// unreachable server surfaces on the first read.
pub fn connect(uri: &str, database: Option<&str>) -> MigrateResult<Database> {
    let client = Client::with_uri_str(uri).map_err(|e| MigrateError::store_io("connect", e))?;
    let db = match database {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
    };
    log::debug!("Using database '{}'", db.name());
    Ok(db)
}

/// [`ControlStore`] backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoControlStore {
    collection: Collection<ControlDocument>,
}

impl MongoControlStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(CONTROL_COLLECTION),
        }
    }
}

impl ControlStore for MongoControlStore {
    fn load(&self) -> MigrateResult<Option<ControlRecord>> {
        let found = self
            .collection
            .find_one(doc! { "_id": CONTROL_ID }, None)
            .map_err(|e| MigrateError::store_io("read", e))?;
        found.map(ControlDocument::into_record).transpose()
    }

    fn save(&self, record: ControlRecord) -> MigrateResult<()> {
        let document = ControlDocument::from_record(record)?;
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(
                doc! { "_id": CONTROL_ID },
                doc! { "$set": { "version": document.version, "locked": document.locked } },
                options,
            )
            .map_err(|e| MigrateError::store_io("write", e))?;
        Ok(())
    }
}
