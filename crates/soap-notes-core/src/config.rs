//! Core runtime configuration.
//!
//! Resolved once at startup and passed into [`NoteSession`](crate::session::NoteSession);
//! nothing below this module reads environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::export::Locale;
use crate::storage::PATIENTS_KEY;

pub const DATABASE_PATH_ENV: &str = "SOAP_NOTES_DB";
pub const EXPORT_DIR_ENV: &str = "SOAP_NOTES_EXPORT_DIR";
pub const STORAGE_KEY_ENV: &str = "SOAP_NOTES_STORAGE_KEY";
pub const LOCALE_ENV: &str = "SOAP_NOTES_LOCALE";

const DEFAULT_DATABASE_PATH: &str = "soap-notes.db";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("storage key cannot be empty")]
    EmptyStorageKey,

    #[error(transparent)]
    UnknownLocale(#[from] crate::export::UnknownLocale),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    export_dir: PathBuf,
    storage_key: String,
    locale: Locale,
}

impl CoreConfig {
    pub fn new(
        database_path: PathBuf,
        export_dir: PathBuf,
        storage_key: String,
        locale: Locale,
    ) -> Result<Self, ConfigError> {
        if storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }

        Ok(Self {
            database_path,
            export_dir,
            storage_key,
            locale,
        })
    }

    /// Build from `SOAP_NOTES_*` environment variables, using defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(DATABASE_PATH_ENV).ok(),
            std::env::var(EXPORT_DIR_ENV).ok(),
            std::env::var(STORAGE_KEY_ENV).ok(),
            std::env::var(LOCALE_ENV).ok(),
        )
    }

    /// Build from optional raw values. Empty or whitespace values count as unset.
    pub fn from_values(
        database_path: Option<String>,
        export_dir: Option<String>,
        storage_key: Option<String>,
        locale: Option<String>,
    ) -> Result<Self, ConfigError> {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let locale = non_empty(locale)
            .map(|v| v.parse::<Locale>())
            .transpose()?
            .unwrap_or_default();

        Self::new(
            non_empty(database_path)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            non_empty(export_dir)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            non_empty(storage_key).unwrap_or_else(|| PATIENTS_KEY.to_string()),
            locale,
        )
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            export_dir: PathBuf::from("."),
            storage_key: PATIENTS_KEY.to_string(),
            locale: Locale::default(),
        }
    }
}
