pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod parsing;
pub mod summary;

use std::path::{Path, PathBuf};

use error::FlexsheetError;
use export::stamp::{find_signature_anchor, stamp_signature, StampOptions};
use export::{naming, xlsx, Approval};
use extraction::{PdfExtractor, TextFragment};
use model::{Anchor, DocumentRecord, SummaryEntry};
use parsing::ExtractOptions;

/// First-page fragments of a PDF, in reading order.
pub fn extract_fragments(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
) -> Result<Vec<TextFragment>, FlexsheetError> {
    let raw = extractor.extract_first_page(pdf_bytes)?;
    let ordered = layout::reading_order(&raw);
    tracing::debug!(
        backend = extractor.backend_name(),
        extracted = raw.len(),
        visible = ordered.len(),
        "first page extracted"
    );
    Ok(ordered)
}

/// Main API entry point: read a timesheet PDF into a [`DocumentRecord`].
pub fn extract_document(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    options: &ExtractOptions,
) -> Result<DocumentRecord, FlexsheetError> {
    let fragments = extract_fragments(pdf_bytes, extractor)?;
    parsing::parse_document(&fragments, options)
}

/// Position of the customer signature box, if the form has one.
pub fn locate_signature(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
) -> Result<Option<Anchor>, FlexsheetError> {
    let fragments = extract_fragments(pdf_bytes, extractor)?;
    Ok(find_signature_anchor(&fragments))
}

/// Stamp the signature onto page 1 at the "Signature customer" box.
pub fn sign_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    signature_image: &[u8],
    options: &StampOptions,
) -> Result<Vec<u8>, FlexsheetError> {
    let anchor =
        locate_signature(pdf_bytes, extractor)?.ok_or(FlexsheetError::SignatureAnchorNotFound)?;
    stamp_signature(pdf_bytes, signature_image, anchor, options)
}

/// Everything a signing run produces for one timesheet.
#[derive(Debug, Clone)]
pub struct SignedOutputs {
    pub document: DocumentRecord,
    pub summary: Vec<SummaryEntry>,
    pub pdf_file_name: String,
    pub pdf: Vec<u8>,
    pub excel_file_name: String,
    pub excel: Vec<u8>,
}

/// Extract, summarise, sign and export one timesheet PDF.
///
/// Extraction runs once; the same ordered fragments feed both the document
/// record and the signature anchor.
pub fn build_outputs(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    signature_image: &[u8],
    extract: &ExtractOptions,
    stamp: &StampOptions,
) -> Result<SignedOutputs, FlexsheetError> {
    let fragments = extract_fragments(pdf_bytes, extractor)?;
    let document = parsing::parse_document(&fragments, extract)?;
    let summary = summary::create_summary(&document);

    let anchor = find_signature_anchor(&fragments).ok_or(FlexsheetError::SignatureAnchorNotFound)?;
    let pdf = stamp_signature(pdf_bytes, signature_image, anchor, stamp)?;
    let excel = xlsx::write_workbook(&document, &summary, Some(&stamp.approval))?;

    Ok(SignedOutputs {
        pdf_file_name: naming::signed_pdf_file_name(&document),
        excel_file_name: naming::signed_excel_file_name(&document),
        document,
        summary,
        pdf,
        excel,
    })
}

impl SignedOutputs {
    /// Write both files into `folder`, returning their paths (PDF first).
    pub fn write_to(&self, folder: &Path) -> Result<[PathBuf; 2], FlexsheetError> {
        std::fs::create_dir_all(folder)?;
        let pdf_path = folder.join(&self.pdf_file_name);
        let excel_path = folder.join(&self.excel_file_name);
        std::fs::write(&pdf_path, &self.pdf)?;
        std::fs::write(&excel_path, &self.excel)?;
        tracing::info!(pdf = %pdf_path.display(), excel = %excel_path.display(), "outputs written");
        Ok([pdf_path, excel_path])
    }
}

/// Approval stamped today by `manager`.
pub fn approve_today(manager: impl Into<String>) -> Approval {
    Approval {
        manager: manager.into(),
        date: chrono::Local::now().date_naive(),
    }
}
