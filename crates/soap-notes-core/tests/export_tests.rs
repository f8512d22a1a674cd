//! PDF export integration tests.

use lopdf::Document;
use soap_notes_core::export::{Locale, NoteExporter};
use soap_notes_core::models::{InfoField, NoteSection};
use soap_notes_core::storage::MemoryStore;
use soap_notes_core::{CoreConfig, NoteSession};

fn session_in(dir: &std::path::Path, locale: &str) -> NoteSession {
    let config = CoreConfig::from_values(
        None,
        Some(dir.display().to_string()),
        None,
        Some(locale.to_string()),
    )
    .unwrap();
    NoteSession::with_storage(config, Box::new(MemoryStore::new()))
}

fn add_patient_with_vitals(session: &mut NoteSession) {
    for (field, value) in [
        (InfoField::Name, "Ana Pérez"),
        (InfoField::Sex, "F"),
        (InfoField::Age, "34"),
        (InfoField::Weight, "60"),
        (InfoField::Height, "165"),
        (InfoField::Bmi, "22"),
        (InfoField::BloodPressure, "120/80"),
        (InfoField::HeartRate, "72"),
        (InfoField::RespiratoryRate, "16"),
        (InfoField::Temperature, "36.8"),
        (InfoField::OxygenSaturation, "98"),
    ] {
        session.set_intake_field(field, value);
    }
    session.add_patient().unwrap().unwrap();
}

#[test]
fn test_export_writes_named_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), "es");
    add_patient_with_vitals(&mut session);
    session.set_note_section(NoteSection::Subjective, "Dolor abdominal");
    session.save_note().unwrap();

    let path = session.export_entry(0).unwrap();
    assert_eq!(path, dir.path().join("Nota-Ana Pérez.pdf"));

    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_export_does_not_touch_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), "es");
    add_patient_with_vitals(&mut session);
    session.save_note().unwrap();

    let before = session.store().patients().to_vec();
    session.export_entry(0).unwrap();
    session.export_entry(0).unwrap();
    assert_eq!(session.store().patients(), before.as_slice());
}

#[test]
fn test_rows_fixed_order_regardless_of_empty_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), "en");
    add_patient_with_vitals(&mut session);

    // Only a few sections filled, out of order.
    session.set_note_section(NoteSection::Medications, "Amoxicillin 500mg");
    session.set_note_section(NoteSection::Analysis, "Otitis media");
    session.set_note_section(NoteSection::Subjective, "Ear pain");
    let entry = session.save_note().unwrap().unwrap();

    let layout = NoteExporter::new(Locale::English).layout(&entry);
    let labels: Vec<_> = layout.rows.iter().map(|row| row.label).collect();
    assert_eq!(
        labels,
        [
            "Subjective",
            "Objective",
            "Analysis",
            "Plan",
            "Labs",
            "Imaging",
            "Referrals",
            "Results",
            "Medications"
        ]
    );
    let sections: Vec<_> = layout.rows.iter().map(|row| row.section).collect();
    assert_eq!(sections, NoteSection::ALL);

    assert_eq!(layout.rows[0].lines, vec!["Ear pain"]);
    assert_eq!(layout.rows[1].lines, vec![""]);
    assert_eq!(layout.rows[8].lines, vec!["Amoxicillin 500mg"]);
}

#[test]
fn test_spanish_header_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), "es");
    add_patient_with_vitals(&mut session);
    let entry = session.save_note().unwrap().unwrap();

    let layout = NoteExporter::new(Locale::Spanish).layout(&entry);
    let texts: Vec<&str> = layout.texts().map(|t| t.text.as_str()).collect();

    assert_eq!(texts[0], "Nota - Ana Pérez");
    assert_eq!(texts[1], "Sexo: F  Edad: 34  Peso: 60kg  Talla: 165cm  IMC: 22");
    assert_eq!(texts[2], "PA: 120/80  FC: 72  FR: 16  Temp: 36.8°C  SpO₂: 98%");
    assert_eq!(&texts[3..5], &["Sección", "Contenido"]);
    assert_eq!(texts[5], "Subjetivo");
}

#[test]
fn test_export_uses_snapshot_not_current_vitals() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), "es");
    add_patient_with_vitals(&mut session);
    let entry = session.save_note().unwrap().unwrap();

    session.set_vitals_field(InfoField::Temperature, "40.1");
    session.save_note().unwrap();

    let first = &session.history()[0];
    assert_eq!(first, &entry);
    let layout = NoteExporter::new(Locale::Spanish).layout(first);
    assert!(layout.texts().any(|t| t.text.contains("Temp: 36.8°C")));
    assert!(!layout.texts().any(|t| t.text.contains("40.1")));
}

#[test]
fn test_long_note_spans_pages() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path(), "es");
    add_patient_with_vitals(&mut session);

    let results = (1..=250)
        .map(|i| format!("Hemoglobina {} g/dL, control número {}", 12 + i % 3, i))
        .collect::<Vec<_>>()
        .join("\n");
    session.set_note_section(NoteSection::Results, results.clone());
    session.save_note().unwrap();

    let path = session.export_entry(0).unwrap();
    let doc = Document::load(&path).unwrap();
    assert!(doc.get_pages().len() >= 3);

    let entry = &session.history()[0];
    let layout = NoteExporter::new(Locale::Spanish).layout(entry);
    assert_eq!(layout.pages.len(), doc.get_pages().len());
    let row = &layout.rows[NoteSection::Results.index()];
    assert_eq!(row.lines.join("\n"), results);
}
