pub mod parse;
pub mod sign;
pub mod summary;

use flexsheet_core::error::FlexsheetError;
use flexsheet_core::extraction::lopdf_text::LopdfExtractor;
use flexsheet_core::extraction::pdftotext::PdftotextExtractor;
use flexsheet_core::extraction::PdfExtractor;

/// Extraction backend by name.
pub fn extractor(backend: &str) -> Result<Box<dyn PdfExtractor>, FlexsheetError> {
    match backend {
        "pdftotext" => Ok(Box::new(PdftotextExtractor::new())),
        "lopdf" => Ok(Box::new(LopdfExtractor::new())),
        other => Err(FlexsheetError::Extraction(format!(
            "unknown backend '{other}' (expected pdftotext or lopdf)"
        ))),
    }
}
