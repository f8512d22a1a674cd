//! PDF serialization of a [`NoteLayout`].

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::layout::{Font, NoteLayout, Page, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use super::{ExportError, ExportResult};

/// Serialize `layout` to PDF bytes using the standard Helvetica fonts.
pub fn render_pdf(layout: &NoteLayout) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(page);
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::new();

    for fill in &page.fills {
        operations.push(color_op("rg", fill.color));
        operations.push(Operation::new(
            "re",
            vec![
                real(fill.x),
                real(PAGE_HEIGHT - fill.top - fill.height),
                real(fill.width),
                real(fill.height),
            ],
        ));
        operations.push(Operation::new("f", vec![]));
    }

    for run in &page.texts {
        let font = match run.font {
            Font::Regular => "F1",
            Font::Bold => "F2",
        };
        operations.push(Operation::new("BT", vec![]));
        operations.push(color_op("rg", run.color));
        operations.push(Operation::new("Tf", vec![font.into(), real(run.size)]));
        operations.push(Operation::new(
            "Td",
            vec![real(run.x), real(PAGE_HEIGHT - run.baseline)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

fn color_op(operator: &str, Rgb(r, g, b): Rgb) -> Operation {
    let channel = |v: u8| real(f32::from(v) / 255.0);
    Operation::new(operator, vec![channel(r), channel(g), channel(b)])
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Encode `text` for a WinAnsiEncoding font.
///
/// Latin-1 maps straight through, a handful of typographic characters map to
/// their cp1252 slots, subscript digits become plain digits and anything else
/// becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '₀'..='₉' => b'0' + (ch as u32 - '₀' as u32) as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::labels::Locale;
    use crate::export::layout::layout_note;
    use crate::models::{NoteDraft, NoteEntry, NoteSection, PatientInfo};

    fn entry(plan: &str) -> NoteEntry {
        let mut note = NoteDraft::default();
        note.set_section(NoteSection::Plan, plan);
        NoteEntry {
            date: "01/02/2024, 10:00:00".into(),
            note,
            patient_info: PatientInfo::named("Ana Pérez"),
        }
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Sección"), b"Secci\xf3n".to_vec());
        assert_eq!(encode_win_ansi("36.8°C"), b"36.8\xb0C".to_vec());
        assert_eq!(encode_win_ansi("SpO₂"), b"SpO2".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
        assert_eq!(encode_win_ansi("漢"), b"?".to_vec());
    }

    #[test]
    fn test_render_produces_pdf() {
        let layout = layout_note(&entry("Reposo"), Locale::Spanish.labels());
        let bytes = render_pdf(&layout).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_page_count_matches_layout() {
        let plan = (0..300)
            .map(|i| format!("Paso {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let layout = layout_note(&entry(&plan), Locale::Spanish.labels());
        assert!(layout.pages.len() > 1);

        let bytes = render_pdf(&layout).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), layout.pages.len());
    }
}
