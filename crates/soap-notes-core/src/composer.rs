//! Transient editing state for one note and the selected patient's vitals.

use crate::models::{InfoField, NoteDraft, NoteSection, Patient, PatientInfo};

/// Unsaved note text plus the editable vitals of the bound patient.
///
/// Rebinding to another patient discards unsaved edits. Callers that want to
/// confirm first can check [`NoteComposer::has_unsaved_changes`].
#[derive(Debug, Clone, Default)]
pub struct NoteComposer {
    note: NoteDraft,
    vitals: PatientInfo,
    /// Vitals as last loaded or saved, for change detection
    baseline: PatientInfo,
}

impl NoteComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to `patient`, loading its current info and clearing the note.
    pub fn bind(&mut self, patient: Option<&Patient>) {
        let info = patient.map(|p| p.info.clone()).unwrap_or_default();
        self.note = NoteDraft::default();
        self.baseline = info.clone();
        self.vitals = info;
    }

    pub fn note(&self) -> &NoteDraft {
        &self.note
    }

    pub fn vitals(&self) -> &PatientInfo {
        &self.vitals
    }

    pub fn set_note_section(&mut self, section: NoteSection, text: impl Into<String>) {
        self.note.set_section(section, text);
    }

    pub fn set_vitals_field(&mut self, field: InfoField, value: impl Into<String>) {
        self.vitals.set_field(field, value);
    }

    /// Reset after a successful save: the note goes blank and the saved
    /// vitals become the new baseline.
    pub fn mark_saved(&mut self) {
        self.note = NoteDraft::default();
        self.baseline = self.vitals.clone();
    }

    /// True when the note has text or the vitals differ from the bound
    /// patient's stored info.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.note.is_blank() || self.vitals != self.baseline
    }
}
