//! PDF export of saved notes.

mod labels;
mod layout;
mod pdf;

pub use labels::*;
pub use layout::*;
pub use pdf::*;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::models::NoteEntry;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF encoding error: {0}")]
    Pdf(String),

    #[error("History entry not found: {0}")]
    EntryNotFound(usize),

    #[error("No patient selected")]
    NoPatientSelected,
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Renders saved notes as PDF documents. Never modifies the entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteExporter {
    locale: Locale,
}

impl NoteExporter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Page layout for `entry`.
    pub fn layout(&self, entry: &NoteEntry) -> NoteLayout {
        layout_note(entry, self.locale.labels())
    }

    /// Render `entry` to PDF bytes.
    pub fn render(&self, entry: &NoteEntry) -> ExportResult<Vec<u8>> {
        render_pdf(&self.layout(entry))
    }

    /// Download name for `entry`: `Nota-{name}.pdf`.
    ///
    /// Path separators in the name are replaced so the file always lands in
    /// the export directory.
    pub fn file_name(entry: &NoteEntry) -> String {
        let name: String = entry
            .patient_info
            .name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect();
        format!("Nota-{}.pdf", name)
    }

    /// Render `entry` and write it into `dir`, replacing any file of the
    /// same name. Returns the written path.
    pub fn export_to_dir(&self, entry: &NoteEntry, dir: &Path) -> ExportResult<PathBuf> {
        let bytes = self.render(entry)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(entry));
        fs::write(&path, &bytes)?;

        info!(path = %path.display(), bytes = bytes.len(), "Exported note");
        Ok(path)
    }
}
