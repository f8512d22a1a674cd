//! SOAP Notes Core Library
//!
//! Local-first clinical note taking: patients, SOAP notes with vitals
//! snapshots, and per-note PDF export.
//!
//! # Architecture
//!
//! ```text
//!   Intake form ──add──▶ ┌──────────────────────────┐ ◀──load── key-value slot
//!                        │       PatientStore       │ ──persist─▶ (whole JSON
//!   Patient list ─select▶│  patients + selected id  │             list)
//!                        └────────────┬─────────────┘
//!                                     │ bind
//!                                     ▼
//!                        ┌──────────────────────────┐
//!                        │       NoteComposer       │ ──save──▶ NoteEntry
//!                        │  9 note fields + vitals  │       (vitals snapshot)
//!                        └──────────────────────────┘
//!                                                                │
//!                                                        NoteExporter
//!                                                                │
//!                                                        Nota-{name}.pdf
//! ```
//!
//! # Core Principle
//!
//! **History is append-only.** A saved note carries its own copy of the vitals
//! and is never edited or removed.
//!
//! # Modules
//!
//! - [`storage`]: Key-value slot backends (SQLite, in-memory)
//! - [`models`]: Domain types (PatientInfo, Patient, NoteEntry, ...)
//! - [`store`]: Persisted patient collection
//! - [`composer`]: Unsaved note and vitals edits
//! - [`export`]: PDF layout and rendering
//! - [`session`]: The operations a front end drives
//! - [`config`]: Startup configuration

pub mod composer;
pub mod config;
pub mod export;
pub mod models;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use composer::NoteComposer;
pub use config::{ConfigError, CoreConfig};
pub use export::{ExportError, Locale, NoteExporter};
pub use models::{
    InfoField, NoteDraft, NoteEntry, NoteHistory, NoteSection, Patient, PatientId, PatientInfo,
};
pub use session::{NoteSession, PatientListItem};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageCorruptionError, StorageError};
pub use store::PatientStore;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SoapNotesError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<StorageError> for SoapNotesError {
    fn from(e: StorageError) -> Self {
        SoapNotesError::Storage(e.to_string())
    }
}

impl From<ExportError> for SoapNotesError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::EntryNotFound(_) | ExportError::NoPatientSelected => {
                SoapNotesError::NotFound(e.to_string())
            }
            other => SoapNotesError::Export(other.to_string()),
        }
    }
}

impl From<ConfigError> for SoapNotesError {
    fn from(e: ConfigError) -> Self {
        SoapNotesError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for SoapNotesError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        SoapNotesError::Storage(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install a `tracing` subscriber filtered by `RUST_LOG`
/// (default `soap_notes_core=info`). Safe to call more than once.
#[uniffi::export]
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("soap_notes_core=info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Open a session over the SQLite file at `database_path`, exporting PDFs
/// into `export_dir`.
#[uniffi::export]
pub fn open_session(
    database_path: String,
    export_dir: String,
    locale: String,
) -> Result<Arc<SoapNotesCore>, SoapNotesError> {
    let config = CoreConfig::new(
        PathBuf::from(database_path),
        PathBuf::from(export_dir),
        storage::PATIENTS_KEY.to_string(),
        locale.parse::<Locale>().map_err(ConfigError::from)?,
    )?;
    let session = NoteSession::open(config)?;
    Ok(SoapNotesCore::wrap(session))
}

/// Open a session configured from `SOAP_NOTES_*` environment variables.
#[uniffi::export]
pub fn open_session_from_env() -> Result<Arc<SoapNotesCore>, SoapNotesError> {
    let session = NoteSession::open(CoreConfig::from_env()?)?;
    Ok(SoapNotesCore::wrap(session))
}

/// Open a session that keeps patients in memory only (for testing).
#[uniffi::export]
pub fn open_session_in_memory(
    export_dir: String,
) -> Result<Arc<SoapNotesCore>, SoapNotesError> {
    let config = CoreConfig::from_values(None, Some(export_dir), None, None)?;
    let session = NoteSession::with_storage(config, Box::new(MemoryStore::new()));
    Ok(SoapNotesCore::wrap(session))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct SoapNotesCore {
    session: Arc<Mutex<NoteSession>>,
}

impl SoapNotesCore {
    fn wrap(session: NoteSession) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

#[uniffi::export]
impl SoapNotesCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Set one field of the add-patient form.
    pub fn set_intake_field(
        &self,
        field: FfiInfoField,
        value: String,
    ) -> Result<(), SoapNotesError> {
        let mut session = self.session.lock()?;
        session.set_intake_field(field.into(), value);
        Ok(())
    }

    /// Current contents of the add-patient form.
    pub fn intake(&self) -> Result<FfiPatientInfo, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.intake().clone().into())
    }

    /// Register the patient in the add-patient form. Returns the new id, or
    /// `None` when the name is blank.
    pub fn add_patient(&self) -> Result<Option<String>, SoapNotesError> {
        let mut session = self.session.lock()?;
        let id = session.add_patient()?;
        Ok(id.map(|id| id.to_string()))
    }

    /// Select a patient by id.
    pub fn select_patient(&self, id: String) -> Result<(), SoapNotesError> {
        let mut session = self.session.lock()?;
        session.select_patient(PatientId::from(id));
        Ok(())
    }

    /// Id of the selected patient, if it exists.
    pub fn current_patient_id(&self) -> Result<Option<String>, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.current_patient().map(|p| p.id.to_string()))
    }

    /// Patient list for the sidebar.
    pub fn list_patients(&self) -> Result<Vec<FfiPatientSummary>, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.patient_list().into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Composer Operations
    // =========================================================================

    /// Set one vitals field of the selected patient (unsaved until a note is saved).
    pub fn set_vitals_field(
        &self,
        field: FfiInfoField,
        value: String,
    ) -> Result<(), SoapNotesError> {
        let mut session = self.session.lock()?;
        session.set_vitals_field(field.into(), value);
        Ok(())
    }

    /// Vitals currently in the composer.
    pub fn vitals(&self) -> Result<FfiPatientInfo, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.composer().vitals().clone().into())
    }

    /// One-line summary of the composer's vitals.
    pub fn vitals_summary(&self) -> Result<String, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.vitals_summary())
    }

    /// Set the text of one note section.
    pub fn set_note_section(
        &self,
        section: FfiNoteSection,
        text: String,
    ) -> Result<(), SoapNotesError> {
        let mut session = self.session.lock()?;
        session.set_note_section(section.into(), text);
        Ok(())
    }

    /// Text of one note section.
    pub fn note_section(&self, section: FfiNoteSection) -> Result<String, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.composer().note().section(section.into()).to_string())
    }

    /// Whether switching patient now would discard edits.
    pub fn has_unsaved_changes(&self) -> Result<bool, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.composer().has_unsaved_changes())
    }

    /// Save the note for the selected patient. Returns false when no patient
    /// is selected.
    pub fn save_note(&self) -> Result<bool, SoapNotesError> {
        let mut session = self.session.lock()?;
        Ok(session.save_note()?.is_some())
    }

    /// Whether a failed write left changes that are not in storage yet.
    pub fn has_pending_write(&self) -> Result<bool, SoapNotesError> {
        let session = self.session.lock()?;
        Ok(session.has_pending_write())
    }

    /// Retry a failed write.
    pub fn flush(&self) -> Result<(), SoapNotesError> {
        let mut session = self.session.lock()?;
        session.flush()?;
        Ok(())
    }

    // =========================================================================
    // History & Export Operations
    // =========================================================================

    /// Saved notes of the selected patient, oldest first.
    pub fn history(&self) -> Result<Vec<FfiHistoryEntry>, SoapNotesError> {
        let session = self.session.lock()?;
        let labels = session.config().locale().labels();
        Ok(session
            .history()
            .iter()
            .enumerate()
            .map(|(index, entry)| FfiHistoryEntry {
                index: index as u32,
                date: entry.date.clone(),
                vitals_summary: labels.summary_line(&entry.patient_info),
            })
            .collect())
    }

    /// Export one history entry as `Nota-{name}.pdf`. Returns the file path.
    pub fn export_entry(&self, index: u32) -> Result<String, SoapNotesError> {
        let session = self.session.lock()?;
        let path = session.export_entry(index as usize)?;
        Ok(path.display().to_string())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient info.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInfo {
    pub name: String,
    pub sex: String,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub bmi: String,
    pub blood_pressure: String,
    pub heart_rate: String,
    pub respiratory_rate: String,
    pub temperature: String,
    pub oxygen_saturation: String,
}

impl From<PatientInfo> for FfiPatientInfo {
    fn from(info: PatientInfo) -> Self {
        Self {
            name: info.name,
            sex: info.sex,
            age: info.age,
            weight: info.weight,
            height: info.height,
            bmi: info.bmi,
            blood_pressure: info.blood_pressure,
            heart_rate: info.heart_rate,
            respiratory_rate: info.respiratory_rate,
            temperature: info.temperature,
            oxygen_saturation: info.oxygen_saturation,
        }
    }
}

/// FFI-safe patient list row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientSummary {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

impl From<PatientListItem> for FfiPatientSummary {
    fn from(item: PatientListItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            selected: item.selected,
        }
    }
}

/// FFI-safe history row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryEntry {
    pub index: u32,
    pub date: String,
    pub vitals_summary: String,
}

/// FFI-safe info field selector.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiInfoField {
    Name,
    Sex,
    Age,
    Weight,
    Height,
    Bmi,
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    Temperature,
    OxygenSaturation,
}

impl From<FfiInfoField> for InfoField {
    fn from(field: FfiInfoField) -> Self {
        match field {
            FfiInfoField::Name => InfoField::Name,
            FfiInfoField::Sex => InfoField::Sex,
            FfiInfoField::Age => InfoField::Age,
            FfiInfoField::Weight => InfoField::Weight,
            FfiInfoField::Height => InfoField::Height,
            FfiInfoField::Bmi => InfoField::Bmi,
            FfiInfoField::BloodPressure => InfoField::BloodPressure,
            FfiInfoField::HeartRate => InfoField::HeartRate,
            FfiInfoField::RespiratoryRate => InfoField::RespiratoryRate,
            FfiInfoField::Temperature => InfoField::Temperature,
            FfiInfoField::OxygenSaturation => InfoField::OxygenSaturation,
        }
    }
}

/// FFI-safe note section selector.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiNoteSection {
    Subjective,
    Objective,
    Analysis,
    Plan,
    Labs,
    Imaging,
    Referrals,
    Results,
    Medications,
}

impl From<FfiNoteSection> for NoteSection {
    fn from(section: FfiNoteSection) -> Self {
        match section {
            FfiNoteSection::Subjective => NoteSection::Subjective,
            FfiNoteSection::Objective => NoteSection::Objective,
            FfiNoteSection::Analysis => NoteSection::Analysis,
            FfiNoteSection::Plan => NoteSection::Plan,
            FfiNoteSection::Labs => NoteSection::Labs,
            FfiNoteSection::Imaging => NoteSection::Imaging,
            FfiNoteSection::Referrals => NoteSection::Referrals,
            FfiNoteSection::Results => NoteSection::Results,
            FfiNoteSection::Medications => NoteSection::Medications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_flow() {
        let dir = tempfile::tempdir().unwrap();
        let core = open_session_in_memory(dir.path().display().to_string()).unwrap();

        core.set_intake_field(FfiInfoField::Name, "Ana Pérez".into()).unwrap();
        let id = core.add_patient().unwrap().unwrap();
        assert_eq!(core.current_patient_id().unwrap(), Some(id));
        assert!(core.intake().unwrap().name.is_empty());

        core.set_note_section(FfiNoteSection::Plan, "Reposo".into()).unwrap();
        core.set_vitals_field(FfiInfoField::OxygenSaturation, "97".into()).unwrap();
        assert!(core.has_unsaved_changes().unwrap());
        assert!(core.save_note().unwrap());
        assert_eq!(core.note_section(FfiNoteSection::Plan).unwrap(), "");
        assert!(!core.has_pending_write().unwrap());
        core.flush().unwrap();

        let history = core.history().unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].vitals_summary.ends_with("SpO₂: 97%"));

        let path = core.export_entry(0).unwrap();
        assert!(path.ends_with("Nota-Ana Pérez.pdf"));
    }

    #[test]
    fn test_ffi_errors() {
        let dir = tempfile::tempdir().unwrap();
        let core = open_session_in_memory(dir.path().display().to_string()).unwrap();

        assert!(!core.save_note().unwrap());
        assert!(matches!(core.export_entry(0), Err(SoapNotesError::NotFound(_))));
        assert!(matches!(
            open_session(":memory:".into(), ".".into(), "xx".into()),
            Err(SoapNotesError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
