//! Serializes laid-out pages into a PDF document with `lopdf`.
//!
//! Only the base-14 Helvetica faces are referenced, so no font programs are embedded.
//! Text is written as WinAnsi-encoded literal strings.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::errors::AppError;
use crate::layout::page_flow::TextRun;
use crate::layout::{DrawOp, Font, Page, PageConfig, Rgb};

/// Builds the complete document in memory and returns its bytes.
pub fn write_pdf(pages: &[Page], config: &PageConfig, title: &str) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_ids: Vec<(Font, ObjectId)> = [Font::Regular, Font::Bold]
        .into_iter()
        .map(|font| {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            (font, id)
        })
        .collect();

    let mut font_dict = lopdf::Dictionary::new();
    for (font, id) in &font_ids {
        font_dict.set(font.resource_name(), *id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => font_dict });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page, config),
        };
        let encoded = content
            .encode()
            .map_err(|e| AppError::Render(format!("content stream encoding failed: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
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
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(config.width_pt),
                Object::Real(config.height_pt),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| AppError::Render(format!("PDF serialization failed: {e}")))?;
    Ok(bytes)
}

fn page_operations(page: &Page, config: &PageConfig) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text(run) => text_operations(run, config, &mut ops),
            DrawOp::Rule {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                let pdf_y = config.height_pt - y;
                ops.push(color_op("RG", *color));
                ops.push(Operation::new("w", vec![Object::Real(*thickness)]));
                ops.push(Operation::new(
                    "m",
                    vec![Object::Real(*x1), Object::Real(pdf_y)],
                ));
                ops.push(Operation::new(
                    "l",
                    vec![Object::Real(*x2), Object::Real(pdf_y)],
                ));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }
    ops
}

fn text_operations(run: &TextRun, config: &PageConfig, ops: &mut Vec<Operation>) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![
            Object::Name(run.font.resource_name().as_bytes().to_vec()),
            Object::Real(run.size),
        ],
    ));
    ops.push(color_op("rg", run.color));
    ops.push(Operation::new("Tw", vec![Object::Real(run.word_spacing)]));
    ops.push(Operation::new(
        "Td",
        vec![
            Object::Real(run.x),
            Object::Real(config.height_pt - run.baseline_y),
        ],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn color_op(operator: &str, color: Rgb) -> Operation {
    let [r, g, b] = color.to_unit();
    Operation::new(
        operator,
        vec![Object::Real(r), Object::Real(g), Object::Real(b)],
    )
}

/// Maps text onto WinAnsiEncoding. Characters outside it become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{a4_page_config, Align, PageFlow};

    fn occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle)
            .count()
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Rust"), b"Rust".to_vec());
        assert_eq!(encode_win_ansi("a • b"), vec![b'a', b' ', 0x95, b' ', b'b']);
        assert_eq!(encode_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_written_document_loads_back_with_all_pages() {
        let config = a4_page_config();
        let mut flow = PageFlow::new(config);
        flow.line(&[crate::layout::Span::new(
            "EDUCATION",
            Font::Bold,
            14.0,
            Rgb::DEFAULT_ACCENT,
        )]);
        flow.break_page();
        flow.paragraph("Second page", Font::Regular, 10.0, Rgb::BODY, Align::Left);
        let pages = flow.finish();

        let bytes = write_pdf(&pages, &config, "My CV").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(occurrences(&bytes, b"(EDUCATION)"), 1);

        let loaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }
}
