//! Durable key-value storage for the patient list.
//!
//! The whole patient list lives under a single key as one JSON value. It is
//! read once at startup and overwritten wholesale after every change.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use schema::SCHEMA;
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::models::Patient;

/// Default key under which the patient list is stored.
pub const PATIENTS_KEY: &str = "patients";

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Corruption(#[from] StorageCorruptionError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The stored value exists but cannot be decoded as a patient list.
#[derive(Error, Debug)]
#[error("stored value under '{key}' is malformed: {source}")]
pub struct StorageCorruptionError {
    pub key: String,
    #[source]
    pub source: serde_json::Error,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A single-slot-per-key blob store.
pub trait KeyValueStore: Send {
    /// Read the whole value under `key`, if any.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value under `key`.
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Read and decode the patient list stored under `key`.
///
/// An absent value yields an empty list. A value that does not decode yields
/// [`StorageError::Corruption`].
pub fn read_patients(store: &dyn KeyValueStore, key: &str) -> StorageResult<Vec<Patient>> {
    let Some(raw) = store.read(key)? else {
        return Ok(Vec::new());
    };

    serde_json::from_str(&raw).map_err(|source| {
        StorageCorruptionError {
            key: key.to_string(),
            source,
        }
        .into()
    })
}

/// Encode and write the full patient list under `key`.
pub fn write_patients(
    store: &mut dyn KeyValueStore,
    key: &str,
    patients: &[Patient],
) -> StorageResult<()> {
    let json = serde_json::to_string(patients)?;
    store.write(key, &json)
}
