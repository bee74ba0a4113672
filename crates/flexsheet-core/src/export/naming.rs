use crate::model::DocumentRecord;

/// "{yyyy-MM} -Timesheet flexforce - {consultant} ({company}) - signed.{extension}"
///
/// Path separators inside the consultant or company name are replaced so the
/// result is always a single file name.
pub fn signed_file_name(document: &DocumentRecord, extension: &str) -> String {
    let name = format!(
        "{} -Timesheet flexforce - {} ({}) - signed.{}",
        document.year_month, document.consultant_name, document.company_name, extension
    );
    name.replace(['/', '\\'], "-")
}

pub fn signed_pdf_file_name(document: &DocumentRecord) -> String {
    signed_file_name(document, "pdf")
}

pub fn signed_excel_file_name(document: &DocumentRecord) -> String {
    signed_file_name(document, "xlsx")
}
