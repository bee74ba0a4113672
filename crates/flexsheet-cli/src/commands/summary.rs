use flexsheet_core::error::FlexsheetError;
use flexsheet_core::parsing::ExtractOptions;
use flexsheet_core::summary::create_summary;
use std::path::PathBuf;

use crate::commands::extractor;
use crate::output;

pub fn run(pdf_file: PathBuf, output_format: &str, backend: &str) -> Result<(), FlexsheetError> {
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = extractor(backend)?;
    let document = flexsheet_core::extract_document(
        &pdf_bytes,
        extractor.as_ref(),
        &ExtractOptions::default(),
    )?;
    let summary = create_summary(&document);

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print_summary(&document, &summary),
    }
    Ok(())
}
