use flexsheet_core::error::FlexsheetError;
use flexsheet_core::parsing::ExtractOptions;
use std::path::PathBuf;

use crate::commands::extractor;
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    backend: &str,
    company: Option<String>,
) -> Result<(), FlexsheetError> {
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = extractor(backend)?;
    let mut options = ExtractOptions::default();
    if let Some(company) = company {
        options.company_name = company;
    }
    let document = flexsheet_core::extract_document(&pdf_bytes, extractor.as_ref(), &options)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&document)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} timesheet row(s), written to {}",
                document.timesheet.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&document)?,
            _ => output::table::print_document(&document),
        },
    }

    Ok(())
}
