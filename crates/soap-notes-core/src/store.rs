//! Patient store: the canonical, persisted list of patients.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::models::{NoteDraft, NoteEntry, Patient, PatientId, PatientInfo};
use crate::storage::{self, KeyValueStore, StorageError, StorageResult};

/// Owned patient collection mirrored to a key-value slot.
///
/// Patients keep insertion order; lookups by id go through an index. Every
/// mutation writes the full list back to storage. A mutation whose write
/// fails is kept in memory and marked pending until a later write succeeds.
pub struct PatientStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
    patients: Vec<Patient>,
    index: HashMap<PatientId, usize>,
    current: Option<PatientId>,
    pending_write: bool,
}

impl PatientStore {
    /// Rehydrate the store from `storage`.
    ///
    /// Never fails: an absent value, a malformed value or an unreadable
    /// backend all start the store empty.
    pub fn load(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let patients = match storage::read_patients(&*backend, &key) {
            Ok(patients) => {
                info!(count = patients.len(), key = %key, "Loaded patient list");
                patients
            }
            Err(StorageError::Corruption(e)) => {
                warn!(error = %e, "Discarding malformed patient list");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Could not read patient list, starting empty");
                Vec::new()
            }
        };

        let mut store = Self {
            storage: backend,
            key,
            patients: Vec::new(),
            index: HashMap::new(),
            current: None,
            pending_write: false,
        };
        for patient in patients {
            store.insert(patient);
        }
        store
    }

    fn insert(&mut self, mut patient: Patient) {
        if self.index.contains_key(&patient.id) {
            let fresh = PatientId::generate();
            warn!(duplicate = %patient.id, reassigned = %fresh, "Duplicate patient id in store");
            patient.id = fresh;
        }
        self.index.insert(patient.id.clone(), self.patients.len());
        self.patients.push(patient);
    }

    /// Write the full patient list to storage.
    pub fn persist(&mut self) -> StorageResult<()> {
        if let Err(e) = storage::write_patients(&mut *self.storage, &self.key, &self.patients) {
            self.pending_write = true;
            warn!(error = %e, "Could not persist patient list");
            return Err(e);
        }
        self.pending_write = false;
        debug!(count = self.patients.len(), "Persisted patient list");
        Ok(())
    }

    /// True when the last write failed and storage is behind memory.
    pub fn has_pending_write(&self) -> bool {
        self.pending_write
    }

    /// Register a patient and select it.
    ///
    /// Returns `Ok(None)` without touching the store when the name is blank.
    /// On a write error the patient stays registered and selected.
    pub fn add_patient(&mut self, info: PatientInfo) -> StorageResult<Option<PatientId>> {
        if !info.has_name() {
            debug!("Ignoring patient with blank name");
            return Ok(None);
        }

        let patient = Patient::new(info);
        let id = patient.id.clone();
        self.insert(patient);
        self.current = Some(id.clone());
        self.persist()?;

        info!(patient_id = %id, "Added patient");
        Ok(Some(id))
    }

    /// Select a patient by id. Unknown ids are accepted and resolve to no
    /// current patient.
    pub fn select_patient(&mut self, id: PatientId) {
        debug!(patient_id = %id, "Selected patient");
        self.current = Some(id);
    }

    /// Append a note snapshot to the selected patient and make `info` the
    /// patient's current vitals.
    ///
    /// Returns `Ok(None)` when no known patient is selected. On a write error
    /// the entry stays appended.
    pub fn save_note(
        &mut self,
        note: &NoteDraft,
        info: &PatientInfo,
    ) -> StorageResult<Option<&NoteEntry>> {
        let Some(position) = self.current_position() else {
            debug!("Ignoring note save with no patient selected");
            return Ok(None);
        };

        let patient = &mut self.patients[position];
        patient.info = info.clone();
        patient.history.append(NoteEntry::new(note, info));
        let history_len = patient.history.len();
        self.persist()?;

        info!(
            patient_id = %self.patients[position].id,
            history_len,
            "Saved note"
        );
        Ok(self.patients[position].history.last())
    }

    fn current_position(&self) -> Option<usize> {
        self.current
            .as_ref()
            .and_then(|id| self.index.get(id))
            .copied()
    }

    pub fn current_patient_id(&self) -> Option<&PatientId> {
        self.current.as_ref()
    }

    /// The selected patient, if the selected id is known.
    pub fn current_patient(&self) -> Option<&Patient> {
        self.current_position().map(|i| &self.patients[i])
    }

    pub fn get(&self, id: &PatientId) -> Option<&Patient> {
        self.index.get(id).map(|&i| &self.patients[i])
    }

    /// All patients in registration order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Give back the storage backend, e.g. to reload from it.
    pub fn into_storage(self) -> Box<dyn KeyValueStore> {
        self.storage
    }
}
