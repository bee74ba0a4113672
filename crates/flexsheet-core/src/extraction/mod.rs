pub mod lopdf_text;
pub mod pdftotext;

use serde::{Deserialize, Serialize};

use crate::error::FlexsheetError;

/// A positioned run of text on a page, as reported by a text-extraction backend.
///
/// `transform` is the PDF text matrix `[a, b, c, d, x, y]` in user space
/// (origin bottom-left, y grows upwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub transform: [f32; 6],
    pub width: f32,
    pub height: f32,
}

impl TextFragment {
    /// Fragment at `(x, y)` with an identity scale/skew.
    pub fn at(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        TextFragment {
            text: text.into(),
            transform: [1.0, 0.0, 0.0, 1.0, x, y],
            width,
            height,
        }
    }

    pub fn x(&self) -> f32 {
        self.transform[4]
    }

    pub fn y(&self) -> f32 {
        self.transform[5]
    }

    /// Zero-area fragments are layout artifacts that never print.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract the positioned text fragments of the first page, in content order.
    fn extract_first_page(&self, pdf_bytes: &[u8]) -> Result<Vec<TextFragment>, FlexsheetError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_accessors() {
        let f = TextFragment::at("Qty.", 40.0, 512.5, 18.0, 9.0);
        assert_eq!(f.x(), 40.0);
        assert_eq!(f.y(), 512.5);
        assert!(f.is_visible());
    }

    #[test]
    fn test_zero_area_is_invisible() {
        assert!(!TextFragment::at(" ", 0.0, 0.0, 0.0, 9.0).is_visible());
        assert!(!TextFragment::at(" ", 0.0, 0.0, 12.0, 0.0).is_visible());
    }
}
