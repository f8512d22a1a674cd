//! SOAP note models: the editable draft, saved entries and the history log.

use serde::{Deserialize, Deserializer, Serialize};

use super::patient::PatientInfo;

/// Timestamp format used for saved notes (day-first, local time).
pub const NOTE_DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Note sections, in the order they are edited and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteSection {
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

impl NoteSection {
    /// All sections in fixed export order.
    pub const ALL: [NoteSection; 9] = [
        NoteSection::Subjective,
        NoteSection::Objective,
        NoteSection::Analysis,
        NoteSection::Plan,
        NoteSection::Labs,
        NoteSection::Imaging,
        NoteSection::Referrals,
        NoteSection::Results,
        NoteSection::Medications,
    ];

    /// Position of this section in [`NoteSection::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Free text for the nine note sections. Empty strings are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteDraft {
    pub subjective: String,
    pub objective: String,
    pub analysis: String,
    pub plan: String,
    pub labs: String,
    pub imaging: String,
    pub referrals: String,
    pub results: String,
    pub medications: String,
}

impl NoteDraft {
    pub fn section(&self, section: NoteSection) -> &str {
        match section {
            NoteSection::Subjective => &self.subjective,
            NoteSection::Objective => &self.objective,
            NoteSection::Analysis => &self.analysis,
            NoteSection::Plan => &self.plan,
            NoteSection::Labs => &self.labs,
            NoteSection::Imaging => &self.imaging,
            NoteSection::Referrals => &self.referrals,
            NoteSection::Results => &self.results,
            NoteSection::Medications => &self.medications,
        }
    }

    pub fn set_section(&mut self, section: NoteSection, text: impl Into<String>) {
        let slot = match section {
            NoteSection::Subjective => &mut self.subjective,
            NoteSection::Objective => &mut self.objective,
            NoteSection::Analysis => &mut self.analysis,
            NoteSection::Plan => &mut self.plan,
            NoteSection::Labs => &mut self.labs,
            NoteSection::Imaging => &mut self.imaging,
            NoteSection::Referrals => &mut self.referrals,
            NoteSection::Results => &mut self.results,
            NoteSection::Medications => &mut self.medications,
        };
        *slot = text.into();
    }

    /// True when every section is empty.
    pub fn is_blank(&self) -> bool {
        NoteSection::ALL.iter().all(|s| self.section(*s).is_empty())
    }
}

/// A saved note. Carries its own copy of the vitals as they were at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    /// Human-readable creation timestamp
    pub date: String,
    #[serde(flatten)]
    pub note: NoteDraft,
    /// Vitals snapshot, independent of the patient's current info
    #[serde(rename = "patientInfo", default)]
    pub patient_info: PatientInfo,
}

impl NoteEntry {
    /// Snapshot a draft and the vitals, stamped with the current local time.
    pub fn new(note: &NoteDraft, patient_info: &PatientInfo) -> Self {
        Self {
            date: chrono::Local::now().format(NOTE_DATE_FORMAT).to_string(),
            note: note.clone(),
            patient_info: patient_info.clone(),
        }
    }

    pub fn section(&self, section: NoteSection) -> &str {
        self.note.section(section)
    }
}

/// Append-only log of saved notes, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NoteHistory(Vec<NoteEntry>);

impl NoteHistory {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry and return a reference to it.
    pub fn append(&mut self, entry: NoteEntry) -> &NoteEntry {
        self.0.push(entry);
        &self.0[self.0.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&NoteEntry> {
        self.0.get(index)
    }

    pub fn last(&self) -> Option<&NoteEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEntry> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[NoteEntry] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a NoteHistory {
    type Item = &'a NoteEntry;
    type IntoIter = std::slice::Iter<'a, NoteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for NoteHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A null history is treated the same as a missing one.
        let entries = Option::<Vec<NoteEntry>>::deserialize(deserializer)?;
        Ok(Self(entries.unwrap_or_default()))
    }
}
