//! Page layout for an exported note.
//!
//! Produces positioned text and filled rectangles per page. Coordinates are
//! PDF points measured from the top-left corner of an A4 page; the PDF writer
//! flips them.

use crate::models::{NoteEntry, NoteSection};

use super::labels::{note_title, Labels};

/// Millimetres to points.
pub const MM: f32 = 72.0 / 25.4;
pub const PAGE_WIDTH: f32 = 210.0 * MM;
pub const PAGE_HEIGHT: f32 = 297.0 * MM;
pub const MARGIN: f32 = 14.0 * MM;

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 12.0;
const TITLE_BASELINE: f32 = 15.0 * MM;
const DEMOGRAPHICS_BASELINE: f32 = 25.0 * MM;
const VITALS_BASELINE: f32 = 32.0 * MM;
const TABLE_TOP: f32 = 40.0 * MM;

const CELL_SIZE: f32 = 10.0;
const CELL_LINE_HEIGHT: f32 = CELL_SIZE * 1.15;
const CELL_PADDING: f32 = 5.0;
const LABEL_COLUMN_WIDTH: f32 = 35.0 * MM;
const TABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const CONTENT_COLUMN_WIDTH: f32 = TABLE_WIDTH - LABEL_COLUMN_WIDTH;

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
const HEAD_FILL: Rgb = Rgb(41, 128, 185);
const BODY_TEXT: Rgb = Rgb(80, 80, 80);
const STRIPE_FILL: Rgb = Rgb(245, 245, 245);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub size: f32,
    pub font: Font,
    pub color: Rgb,
    pub text: String,
}

/// A filled rectangle (cell background).
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub x: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Backgrounds, drawn before any text
    pub fills: Vec<Fill>,
    pub texts: Vec<TextRun>,
}

/// One table row as laid out: its label and wrapped content lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub section: NoteSection,
    pub label: &'static str,
    pub lines: Vec<String>,
    /// Page on which the row starts
    pub first_page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteLayout {
    pub pages: Vec<Page>,
    pub rows: Vec<RowLayout>,
}

impl NoteLayout {
    /// Every text run in drawing order across all pages.
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|page| page.texts.iter())
    }
}

/// Lay out `entry` as a title, two header lines and a two-column table.
pub fn layout_note(entry: &NoteEntry, labels: &Labels) -> NoteLayout {
    let info = &entry.patient_info;
    let mut first = Page::default();
    first.texts.push(text(
        MARGIN,
        TITLE_BASELINE,
        TITLE_SIZE,
        Font::Regular,
        BLACK,
        note_title(info),
    ));
    first.texts.push(text(
        MARGIN,
        DEMOGRAPHICS_BASELINE,
        HEADER_SIZE,
        Font::Regular,
        BLACK,
        labels.demographics_line(info),
    ));
    first.texts.push(text(
        MARGIN,
        VITALS_BASELINE,
        HEADER_SIZE,
        Font::Regular,
        BLACK,
        labels.vitals_line(info),
    ));

    let mut table = TableWriter {
        pages: vec![first],
        cursor: TABLE_TOP,
        labels,
    };
    table.head();

    let content_width = CONTENT_COLUMN_WIDTH - 2.0 * CELL_PADDING;
    let mut rows = Vec::with_capacity(NoteSection::ALL.len());
    for (i, section) in NoteSection::ALL.iter().enumerate() {
        let lines = wrap_text(entry.section(*section), CELL_SIZE, content_width);
        let label = labels.section(*section);
        let first_page = table.row(label, &lines, i % 2 == 1);
        rows.push(RowLayout {
            section: *section,
            label,
            lines,
            first_page,
        });
    }

    NoteLayout {
        pages: table.pages,
        rows,
    }
}

fn text(x: f32, baseline: f32, size: f32, font: Font, color: Rgb, text: String) -> TextRun {
    TextRun {
        x,
        baseline,
        size,
        font,
        color,
        text,
    }
}

struct TableWriter<'a> {
    pages: Vec<Page>,
    cursor: f32,
    labels: &'a Labels,
}

impl TableWriter<'_> {
    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn remaining(&self) -> f32 {
        PAGE_HEIGHT - MARGIN - self.cursor
    }

    fn head(&mut self) {
        let height = CELL_LINE_HEIGHT + 2.0 * CELL_PADDING;
        let top = self.cursor;
        let baseline = top + CELL_PADDING + CELL_SIZE;
        let (section, content) = (self.labels.section_header, self.labels.content_header);

        let page = self.page();
        page.fills.push(Fill {
            x: MARGIN,
            top,
            width: TABLE_WIDTH,
            height,
            color: HEAD_FILL,
        });
        page.texts.push(text(
            MARGIN + CELL_PADDING,
            baseline,
            CELL_SIZE,
            Font::Bold,
            WHITE,
            section.to_string(),
        ));
        page.texts.push(text(
            MARGIN + LABEL_COLUMN_WIDTH + CELL_PADDING,
            baseline,
            CELL_SIZE,
            Font::Bold,
            WHITE,
            content.to_string(),
        ));
        self.cursor += height;
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = MARGIN;
        self.head();
    }

    /// Lines that fit in the space left on the current page.
    fn lines_that_fit(&self) -> usize {
        let usable = self.remaining() - 2.0 * CELL_PADDING;
        if usable < CELL_LINE_HEIGHT {
            0
        } else {
            (usable / CELL_LINE_HEIGHT).floor() as usize
        }
    }

    /// Write one body row, splitting it across pages when it does not fit.
    /// Returns the index of the page the row starts on.
    fn row(&mut self, label: &'static str, lines: &[String], striped: bool) -> usize {
        if self.lines_that_fit() == 0 {
            self.new_page();
        }
        let first_page = self.pages.len() - 1;

        let mut pending = lines;
        let mut show_label = true;
        loop {
            let take = self.lines_that_fit().max(1).min(pending.len());
            let (chunk, rest) = pending.split_at(take);
            self.row_chunk(if show_label { label } else { "" }, chunk, striped);

            if rest.is_empty() {
                break;
            }
            pending = rest;
            show_label = false;
            self.new_page();
        }
        first_page
    }

    fn row_chunk(&mut self, label: &str, lines: &[String], striped: bool) {
        let line_count = lines.len().max(1);
        let height = line_count as f32 * CELL_LINE_HEIGHT + 2.0 * CELL_PADDING;
        let top = self.cursor;
        let first_baseline = top + CELL_PADDING + CELL_SIZE;

        let page = self.page();
        if striped {
            page.fills.push(Fill {
                x: MARGIN,
                top,
                width: TABLE_WIDTH,
                height,
                color: STRIPE_FILL,
            });
        }
        if !label.is_empty() {
            page.texts.push(text(
                MARGIN + CELL_PADDING,
                first_baseline,
                CELL_SIZE,
                Font::Regular,
                BODY_TEXT,
                label.to_string(),
            ));
        }
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            page.texts.push(text(
                MARGIN + LABEL_COLUMN_WIDTH + CELL_PADDING,
                first_baseline + i as f32 * CELL_LINE_HEIGHT,
                CELL_SIZE,
                Font::Regular,
                BODY_TEXT,
                line.clone(),
            ));
        }
        self.cursor += height;
    }
}

/// Wrap `text` into lines no wider than `max_width` at font `size`.
///
/// Explicit newlines are kept as line breaks. Indentation and runs of spaces
/// inside a line are kept; the whitespace at a wrap point is dropped. Words
/// wider than a line are broken between characters. Always returns at least
/// one line.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut width = 0.0;
        let mut gap = "";
        let mut rest = paragraph.trim_end();

        while !rest.is_empty() {
            let is_space = rest.starts_with(char::is_whitespace);
            let end = rest
                .find(|c: char| c.is_whitespace() != is_space)
                .unwrap_or(rest.len());
            let (token, tail) = rest.split_at(end);
            rest = tail;
            if is_space {
                gap = token;
                continue;
            }

            let word_width = text_width(token, size);
            let needed = width + text_width(gap, size) + word_width;
            if needed <= max_width {
                line.push_str(gap);
                line.push_str(token);
                width = needed;
                gap = "";
                continue;
            }

            gap = "";
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }

            if word_width <= max_width {
                line.push_str(token);
                width = word_width;
                continue;
            }

            for ch in token.chars() {
                let ch_width = char_width(ch) * size / 1000.0;
                if !line.is_empty() && width + ch_width > max_width {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
                line.push(ch);
                width += ch_width;
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Width of `text` in points when set in Helvetica at `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * size / 1000.0
}

/// Helvetica advance width in 1/1000 em.
fn char_width(ch: char) -> f32 {
    let ch = match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        '₀'..='₉' => '0',
        other => other,
    };

    let width = match ch {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '[' | '\\' | ']' | 'f' | 't' => 278,
        '"' => 355,
        '#' | '$' | '0'..='9' | '?' | 'L' | '_' | 'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n'
        | 'o' | 'p' | 'q' | 'u' => 556,
        '%' => 889,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        '\'' => 191,
        '(' | ')' | '-' | '`' | 'r' | '¡' => 333,
        '*' => 389,
        '+' | '<' | '=' | '>' | '~' => 584,
        '@' => 1015,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' | 'w' => 722,
        'F' | 'T' | 'Z' | '¿' => 611,
        'G' | 'O' | 'Q' => 778,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500,
        'M' | 'm' => 833,
        'W' => 944,
        '^' => 469,
        'i' | 'j' | 'l' => 222,
        '{' | '}' => 334,
        '|' => 260,
        '°' => 400,
        _ => 556,
    };
    width as f32
}
