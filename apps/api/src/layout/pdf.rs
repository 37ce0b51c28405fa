//! PDF writer for laid-out documents, built on `lopdf`.
//!
//! Uses the standard Type1 fonts with WinAnsiEncoding, so nothing is embedded.
//! The whole document is built in memory; on any error nothing is returned.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::layout::engine::{DrawOp, LaidOutDocument, RenderError, Rgb};
use crate::layout::font_metrics::FontStyle;

/// Serializes `doc` to PDF bytes.
pub fn write_pdf(doc: &LaidOutDocument) -> Result<Vec<u8>, RenderError> {
    let mut document = Document::with_version("1.7");
    let pages_id = document.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for style in FontStyle::ALL {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => style.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(style.resource_name(), font_id);
    }
    let resources_id = document.add_object(dictionary! { "Font" => fonts });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(doc.page_count);
    for page in 0..doc.page_count {
        let content = page_content(doc, page);
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = document.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), doc.setup.width.into(), doc.setup.height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = document.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn page_content(doc: &LaidOutDocument, page: usize) -> Content {
    let mut operations = Vec::new();

    for op in doc.ops.iter().filter(|op| op.page() == page) {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                style,
                color,
                text,
                ..
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(style.resource_name().as_bytes().to_vec()), (*size).into()],
                ));
                operations.push(Operation::new("rg", rgb_operands(color)));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule {
                x1,
                y1,
                x2,
                y2,
                thickness,
                color,
                ..
            } => {
                operations.push(Operation::new("w", vec![(*thickness).into()]));
                operations.push(Operation::new("RG", rgb_operands(color)));
                operations.push(Operation::new("m", vec![(*x1).into(), (*y1).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (*y2).into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }

    Content { operations }
}

fn rgb_operands(color: &Rgb) -> Vec<Object> {
    vec![color.r.into(), color.g.into(), color.b.into()]
}

/// Encodes text as WinAnsi. Latin-1 maps directly; a few typographic marks map
/// to their 0x80..0x9F slots; everything else becomes `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2022}' => 0x95,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2026}' => 0x85,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cursor::PageSetup;
    use crate::layout::engine::{render_content, ContentItem};
    use crate::layout::font_metrics::StandardFonts;

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(to_win_ansi("a\u{2013}b"), vec![b'a', 0x96, b'b']);
        assert_eq!(to_win_ansi("\u{2022}"), vec![0x95]);
        assert_eq!(to_win_ansi("é"), vec![0xE9]);
        assert_eq!(to_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_pdf_page_count_matches_layout() {
        let items: Vec<ContentItem> = (0..120)
            .flat_map(|i| {
                [
                    ContentItem::KeepTogether(28.0),
                    ContentItem::Line {
                        text: format!("line {i}"),
                        indent: 0.0,
                        size: 10.0,
                        color: Rgb::BLACK,
                    },
                ]
            })
            .collect();
        let laid_out = render_content(PageSetup::A4, &StandardFonts, &items).unwrap();
        assert!(laid_out.page_count > 1);

        let bytes = write_pdf(&laid_out).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), laid_out.page_count);
    }

    #[test]
    fn test_empty_document_is_single_page_pdf() {
        let laid_out = render_content(PageSetup::A4, &StandardFonts, &[]).unwrap();
        let bytes = write_pdf(&laid_out).unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }
}
