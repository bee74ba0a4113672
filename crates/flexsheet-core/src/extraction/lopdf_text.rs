//! Pure Rust text extraction with `lopdf`.
//!
//! Walks the text operators of the first page's content stream and tracks the
//! text and graphics matrices, producing one [`TextFragment`] per show-text
//! operator. Glyph widths are not read from the font programs; the run width
//! is estimated from the glyph count and the effective font size.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object};

use crate::error::FlexsheetError;
use crate::extraction::{PdfExtractor, TextFragment};

type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// PDF extraction backend that needs no external binaries.
#[derive(Debug, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        LopdfExtractor
    }
}

impl PdfExtractor for LopdfExtractor {
    fn extract_first_page(&self, pdf_bytes: &[u8]) -> Result<Vec<TextFragment>, FlexsheetError> {
        let doc = Document::load_mem(pdf_bytes)?;
        let page_id = doc
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or_else(|| FlexsheetError::Extraction("PDF has no pages".into()))?;

        let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
        let content_data = doc.get_page_content(page_id)?;
        let content = Content::decode(&content_data)?;

        let fragments = walk_operations(&content.operations, |bytes, font| {
            decode_string(&doc, &fonts, font, bytes)
        });
        tracing::debug!(count = fragments.len(), "lopdf produced fragments");
        Ok(fragments)
    }

    fn backend_name(&self) -> &str {
        "lopdf"
    }
}

#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    font_size: f32,
    leading: Option<f32>,
}

/// Interpret content-stream operators into positioned fragments.
///
/// `decode` turns a string operand into text given the active font resource name.
fn walk_operations<F>(operations: &[Operation], decode: F) -> Vec<TextFragment>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut fragments = Vec::new();
    let mut ctm = IDENTITY;
    let mut ctm_stack: Vec<Matrix> = Vec::new();
    let mut text_matrix = IDENTITY;
    let mut line_matrix = IDENTITY;
    let mut state = TextState {
        font: Vec::new(),
        font_size: 12.0,
        leading: None,
    };

    for op in operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => ctm = ctm_stack.pop().unwrap_or(IDENTITY),
            "cm" => {
                if let Some(m) = matrix_operands(operands) {
                    ctm = multiply(&m, &ctm);
                }
            }
            "BT" => {
                text_matrix = IDENTITY;
                line_matrix = IDENTITY;
            }
            "Tf" => {
                if let Some(Ok(name)) = operands.first().map(Object::as_name) {
                    state.font = name.to_vec();
                }
                if let Some(size) = operands.get(1).and_then(number) {
                    state.font_size = size;
                }
            }
            "TL" => state.leading = operands.first().and_then(number),
            "Td" | "TD" => {
                let tx = operands.first().and_then(number).unwrap_or(0.0);
                let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                if op.operator == "TD" {
                    state.leading = Some(-ty);
                }
                line_matrix = multiply(&[1.0, 0.0, 0.0, 1.0, tx, ty], &line_matrix);
                text_matrix = line_matrix;
            }
            "Tm" => {
                if let Some(m) = matrix_operands(operands) {
                    text_matrix = m;
                    line_matrix = m;
                }
            }
            "T*" => {
                next_line(&state, &mut line_matrix);
                text_matrix = line_matrix;
            }
            "Tj" | "'" | "\"" => {
                if op.operator != "Tj" {
                    next_line(&state, &mut line_matrix);
                    text_matrix = line_matrix;
                }
                let string_operand = if op.operator == "\"" {
                    operands.get(2)
                } else {
                    operands.first()
                };
                if let Some(Object::String(bytes, _)) = string_operand {
                    let text = decode(bytes, &state.font);
                    show_text(&mut fragments, &mut text_matrix, &ctm, &state, text, 0.0);
                }
            }
            "TJ" => {
                if let Some(Ok(array)) = operands.first().map(Object::as_array) {
                    let mut text = String::new();
                    let mut adjustment = 0.0;
                    for item in array {
                        match item {
                            Object::String(bytes, _) => text.push_str(&decode(bytes, &state.font)),
                            other => {
                                if let Some(n) = number(other) {
                                    adjustment -= n / 1000.0 * state.font_size;
                                }
                            }
                        }
                    }
                    show_text(&mut fragments, &mut text_matrix, &ctm, &state, text, adjustment);
                }
            }
            _ => {}
        }
    }

    fragments
}

fn next_line(state: &TextState, line_matrix: &mut Matrix) {
    let leading = state.leading.unwrap_or(state.font_size * 1.2);
    *line_matrix = multiply(&[1.0, 0.0, 0.0, 1.0, 0.0, -leading], line_matrix);
}

/// Emit a fragment for `text` at the current text position and advance past it.
fn show_text(
    fragments: &mut Vec<TextFragment>,
    text_matrix: &mut Matrix,
    ctm: &Matrix,
    state: &TextState,
    text: String,
    extra_advance: f32,
) {
    let glyphs = text.chars().count() as f32;
    let advance = glyphs * state.font_size * AVG_GLYPH_WIDTH + extra_advance;
    let rendering = multiply(text_matrix, ctm);

    if !text.trim().is_empty() {
        let x_scale = (rendering[0] * rendering[0] + rendering[1] * rendering[1]).sqrt();
        let y_scale = (rendering[2] * rendering[2] + rendering[3] * rendering[3]).sqrt();
        fragments.push(TextFragment {
            text,
            transform: rendering,
            width: advance.max(0.0) * x_scale,
            height: state.font_size * y_scale,
        });
    }

    *text_matrix = multiply(&[1.0, 0.0, 0.0, 1.0, advance, 0.0], text_matrix);
}

/// Row-vector PDF matrix product `a × b`.
fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

fn matrix_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = IDENTITY;
    for (slot, operand) in m.iter_mut().zip(operands) {
        *slot = number(operand)?;
    }
    Some(m)
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn decode_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font_dict) = fonts.get(font) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return text;
            }
        }
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    fn latin1(bytes: &[u8], _font: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    }

    #[test]
    fn test_td_positions_fragments() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
            op("Td", vec![40.into(), 700.into()]),
            op("Tj", vec![string("Qty.")]),
            op("Td", vec![0.into(), (-20).into()]),
            op("Tj", vec![string("01")]),
            op("ET", vec![]),
        ];
        let fragments = walk_operations(&ops, latin1);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "Qty.");
        assert_eq!((fragments[0].x(), fragments[0].y()), (40.0, 700.0));
        assert_eq!(fragments[0].height, 10.0);
        assert_eq!(fragments[0].width, 20.0);
        assert_eq!((fragments[1].x(), fragments[1].y()), (40.0, 680.0));
    }

    #[test]
    fn test_tm_scale_sets_fragment_height() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 1.into()]),
            op(
                "Tm",
                vec![9.into(), 0.into(), 0.into(), 9.into(), 100.into(), 500.into()],
            ),
            op("Tj", vec![string("Month/Year")]),
            op("ET", vec![]),
        ];
        let fragments = walk_operations(&ops, latin1);
        assert_eq!(fragments[0].height, 9.0);
        assert_eq!((fragments[0].x(), fragments[0].y()), (100.0, 500.0));
    }

    #[test]
    fn test_cm_translates_text_space() {
        let ops = vec![
            op("q", vec![]),
            op(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 10.into(), 20.into()],
            ),
            op("BT", vec![]),
            op("Td", vec![5.into(), 5.into()]),
            op("Tj", vec![string("A")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![5.into(), 5.into()]),
            op("Tj", vec![string("B")]),
            op("ET", vec![]),
        ];
        let fragments = walk_operations(&ops, latin1);
        assert_eq!((fragments[0].x(), fragments[0].y()), (15.0, 25.0));
        assert_eq!((fragments[1].x(), fragments[1].y()), (5.0, 5.0));
    }

    #[test]
    fn test_tj_array_joins_strings() {
        let ops = vec![
            op("BT", vec![]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    string("Total"),
                    (-250).into(),
                    string(" Hours"),
                ])],
            ),
            op("ET", vec![]),
        ];
        let fragments = walk_operations(&ops, latin1);
        assert_eq!(fragments[0].text, "Total Hours");
    }

    #[test]
    fn test_blank_runs_are_skipped_but_advance() {
        let ops = vec![
            op("BT", vec![]),
            op("Tf", vec![Object::Name(b"F1".to_vec()), 10.into()]),
            op("Tj", vec![string("  ")]),
            op("Tj", vec![string("X")]),
            op("ET", vec![]),
        ];
        let fragments = walk_operations(&ops, latin1);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].x(), 10.0);
    }

    #[test]
    fn test_invalid_pdf_is_extraction_error() {
        let err = LopdfExtractor::new()
            .extract_first_page(b"not a pdf")
            .unwrap_err();
        assert!(matches!(err, FlexsheetError::Extraction(_)));
    }
}
