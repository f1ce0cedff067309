//! PDF serialisation of laid-out pages via `lopdf`.
//!
//! Uses the two built-in Helvetica faces with WinAnsiEncoding, so no font files are
//! embedded and every PDF viewer can display the result.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::render::font_metrics::FontFace;
use crate::render::layout::{PageLayout, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};

const PRODUCER: &str = concat!("career-report-api ", env!("CARGO_PKG_VERSION"));

/// Base letters for U+0100..=U+017F (Latin Extended-A), one byte per code point.
const LATIN_EXTENDED_A_BASE: &[u8; 128] = b"AaAaAaCcCcCcCcDd\
DdEeEeEeEeEeGgGg\
GgGgHhHhIiIiIiIi\
IiIiJjKkkLlLlLlL\
lLlNnNnNnnNnOoOo\
OoOoRrRrRrSsSsSs\
SsTtTtTtUuUuUuUu\
UuUuWwYyYZzZzZzs";

/// Encodes text for a WinAnsi (cp1252) font.
///
/// Latin-1 passes through and typographic punctuation maps to its cp1252 slot.
/// Other Latin Extended-A letters drop their diacritics; anything else becomes `?`.
/// Control characters are dropped.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push(b' '),
            c if c.is_control() => {}
            c if (c as u32) < 0x80 => out.push(c as u8),
            '\u{20AC}' => out.push(0x80),
            '\u{2026}' => out.push(0x85),
            '\u{0160}' => out.push(0x8A),
            '\u{0152}' => out.push(0x8C),
            '\u{017D}' => out.push(0x8E),
            '\u{2018}' => out.push(0x91),
            '\u{2019}' => out.push(0x92),
            '\u{201C}' => out.push(0x93),
            '\u{201D}' => out.push(0x94),
            '\u{2022}' => out.push(0x95),
            '\u{2013}' => out.push(0x96),
            '\u{2014}' => out.push(0x97),
            '\u{2122}' => out.push(0x99),
            '\u{0161}' => out.push(0x9A),
            '\u{0153}' => out.push(0x9C),
            '\u{017E}' => out.push(0x9E),
            '\u{0178}' => out.push(0x9F),
            c if (0xA0..=0xFF).contains(&(c as u32)) => out.push(c as u32 as u8),
            '\u{0132}' => out.extend_from_slice(b"IJ"),
            '\u{0133}' => out.extend_from_slice(b"ij"),
            c if (0x100..=0x17F).contains(&(c as u32)) => {
                out.push(LATIN_EXTENDED_A_BASE[(c as u32 - 0x100) as usize])
            }
            _ => out.push(b'?'),
        }
    }
    out
}

fn font_dictionary(face: FontFace) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_content(page: &PageLayout) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 4);
    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.face.resource_name().into(), Object::Real(line.size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&line.text),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Writes the pages into a complete PDF document and returns its bytes.
pub fn write_pdf(pages: &[PageLayout], title: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFace::Regular));
    let bold_id = doc.add_object(font_dictionary(FontFace::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Regular.resource_name() => regular_id,
            FontFace::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH_PT),
                Object::Real(PAGE_HEIGHT_PT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
