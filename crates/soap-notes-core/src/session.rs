//! A note-taking session: patient store, note composer and intake form.
//!
//! This is the surface a front end drives. Every method runs to completion
//! before returning; persistence happens synchronously inside the store.

use std::path::PathBuf;

use tracing::debug;

use crate::composer::NoteComposer;
use crate::config::CoreConfig;
use crate::export::{ExportError, ExportResult, NoteExporter};
use crate::models::{InfoField, NoteEntry, NoteSection, Patient, PatientId, PatientInfo};
use crate::storage::{KeyValueStore, SqliteStore, StorageResult};
use crate::store::PatientStore;

/// Row of the patient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientListItem {
    pub id: PatientId,
    pub name: String,
    pub selected: bool,
}

pub struct NoteSession {
    config: CoreConfig,
    store: PatientStore,
    composer: NoteComposer,
    /// The "add patient" form
    intake: PatientInfo,
    exporter: NoteExporter,
}

impl NoteSession {
    /// Open a session backed by the SQLite file named in `config`.
    pub fn open(config: CoreConfig) -> StorageResult<Self> {
        let storage = SqliteStore::open(config.database_path())?;
        Ok(Self::with_storage(config, Box::new(storage)))
    }

    /// Open a session over any storage backend.
    pub fn with_storage(config: CoreConfig, storage: Box<dyn KeyValueStore>) -> Self {
        let store = PatientStore::load(storage, config.storage_key());
        let exporter = NoteExporter::new(config.locale());
        Self {
            config,
            store,
            composer: NoteComposer::new(),
            intake: PatientInfo::default(),
            exporter,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    pub fn composer(&self) -> &NoteComposer {
        &self.composer
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub fn intake(&self) -> &PatientInfo {
        &self.intake
    }

    pub fn set_intake_field(&mut self, field: InfoField, value: impl Into<String>) {
        self.intake.set_field(field, value);
    }

    /// Register the patient described by the intake form.
    ///
    /// Once the patient is registered it is selected and the intake form is
    /// cleared, including when the write fails and the error is returned.
    /// A blank name leaves everything, including the form, unchanged.
    pub fn add_patient(&mut self) -> StorageResult<Option<PatientId>> {
        let before = self.store.len();
        let result = self.store.add_patient(self.intake.clone());
        if self.store.len() > before {
            self.intake = PatientInfo::default();
            self.composer.bind(self.store.current_patient());
        }
        result
    }

    /// Select a patient and load it into the composer.
    ///
    /// Unsaved composer edits are discarded.
    pub fn select_patient(&mut self, id: PatientId) {
        if self.composer.has_unsaved_changes() {
            debug!("Discarding unsaved note edits on patient switch");
        }
        self.store.select_patient(id);
        self.composer.bind(self.store.current_patient());
    }

    pub fn current_patient(&self) -> Option<&Patient> {
        self.store.current_patient()
    }

    pub fn patient_list(&self) -> Vec<PatientListItem> {
        let current = self.store.current_patient_id();
        self.store
            .patients()
            .iter()
            .map(|p| PatientListItem {
                id: p.id.clone(),
                name: p.info.name.clone(),
                selected: current == Some(&p.id),
            })
            .collect()
    }

    // =========================================================================
    // Composer
    // =========================================================================

    pub fn set_note_section(&mut self, section: NoteSection, text: impl Into<String>) {
        self.composer.set_note_section(section, text);
    }

    pub fn set_vitals_field(&mut self, field: InfoField, value: impl Into<String>) {
        self.composer.set_vitals_field(field, value);
    }

    /// Summary of the vitals currently in the composer.
    pub fn vitals_summary(&self) -> String {
        self.config
            .locale()
            .labels()
            .summary_line(self.composer.vitals())
    }

    /// Save the composer's note for the selected patient.
    ///
    /// Returns the saved entry, or `None` when no patient is selected. Once
    /// the entry is appended the note text is cleared, including when the
    /// write fails and the error is returned; [`Self::flush`] retries it.
    pub fn save_note(&mut self) -> StorageResult<Option<NoteEntry>> {
        let before = self.history().len();
        let result = self
            .store
            .save_note(self.composer.note(), self.composer.vitals())
            .map(|saved| saved.cloned());
        if self.history().len() > before {
            self.composer.mark_saved();
        }
        result
    }

    /// True when a change is held in memory that storage does not have yet.
    pub fn has_pending_write(&self) -> bool {
        self.store.has_pending_write()
    }

    /// Write the patient list again if an earlier write failed.
    pub fn flush(&mut self) -> StorageResult<()> {
        if self.store.has_pending_write() {
            self.store.persist()?;
        }
        Ok(())
    }

    /// Saved notes of the selected patient, oldest first.
    pub fn history(&self) -> &[NoteEntry] {
        self.store
            .current_patient()
            .map(|p| p.history.as_slice())
            .unwrap_or_default()
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Export one history entry of the selected patient to the export
    /// directory. Returns the written path.
    pub fn export_entry(&self, index: usize) -> ExportResult<PathBuf> {
        let patient = self
            .store
            .current_patient()
            .ok_or(ExportError::NoPatientSelected)?;
        let entry = patient
            .history
            .get(index)
            .ok_or(ExportError::EntryNotFound(index))?;
        self.exporter.export_to_dir(entry, self.config.export_dir())
    }
}
