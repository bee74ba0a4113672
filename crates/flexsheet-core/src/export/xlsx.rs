use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::FlexsheetError;
use crate::export::Approval;
use crate::model::{DocumentRecord, SummaryEntry};

pub const TIMESHEET_SHEET: &str = "Timesheet";
pub const SUMMARY_SHEET: &str = "Summary";

/// First row of the entries table on the timesheet sheet (0-based).
const TABLE_HEADER_ROW: u32 = 6;

impl From<XlsxError> for FlexsheetError {
    fn from(e: XlsxError) -> Self {
        FlexsheetError::Export(e.to_string())
    }
}

/// Render the document and its summary as an xlsx workbook.
///
/// The "Timesheet" sheet holds the header fields and one row per entry with a
/// total; the "Summary" sheet holds one row per summary entry.
pub fn write_workbook(
    document: &DocumentRecord,
    summary: &[SummaryEntry],
    approval: Option<&Approval>,
) -> Result<Vec<u8>, FlexsheetError> {
    let bold = Format::new().set_bold();
    let hours_format = Format::new().set_num_format("0.00");
    let total_format = Format::new().set_bold().set_num_format("0.00");

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(TIMESHEET_SHEET)?;
    write_header(sheet, document, approval, &bold)?;

    sheet.write_string_with_format(TABLE_HEADER_ROW, 0, "Day", &bold)?;
    sheet.write_string_with_format(TABLE_HEADER_ROW, 1, "Activity", &bold)?;
    sheet.write_string_with_format(TABLE_HEADER_ROW, 2, "Hours", &bold)?;
    let mut row = TABLE_HEADER_ROW + 1;
    for entry in &document.timesheet {
        sheet.write_string(row, 0, &entry.day)?;
        sheet.write_string(row, 1, &entry.name)?;
        sheet.write_number_with_format(row, 2, to_number(entry.hours), &hours_format)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Total", &bold)?;
    sheet.write_number_with_format(row, 2, to_number(document.total_hours()), &total_format)?;
    sheet.set_column_width(0, 14)?;
    sheet.set_column_width(1, 40)?;
    sheet.set_column_width(2, 10)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    sheet.write_string_with_format(0, 0, "Name", &bold)?;
    sheet.write_string_with_format(0, 1, "Code", &bold)?;
    sheet.write_string_with_format(0, 2, "Hours", &bold)?;
    for (i, entry) in summary.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &entry.name)?;
        sheet.write_string(row, 1, &entry.code)?;
        sheet.write_number_with_format(row, 2, to_number(entry.hours), &hours_format)?;
    }
    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(1, 20)?;

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(
        rows = document.timesheet.len(),
        summary = summary.len(),
        bytes = bytes.len(),
        "workbook written"
    );
    Ok(bytes)
}

fn write_header(
    sheet: &mut Worksheet,
    document: &DocumentRecord,
    approval: Option<&Approval>,
    bold: &Format,
) -> Result<(), XlsxError> {
    let mut fields = vec![
        ("Period", document.period.clone()),
        ("Consultant", document.consultant_name.clone()),
        ("Company", document.company_name.clone()),
        ("Project", document.project.to_string()),
    ];
    if let Some(approval) = approval {
        fields.push(("Approved", approval.caption()));
    }

    for (row, (label, value)) in fields.iter().enumerate() {
        sheet.write_string_with_format(row as u32, 0, *label, bold)?;
        sheet.write_string(row as u32, 1, value)?;
    }
    Ok(())
}

fn to_number(hours: Decimal) -> f64 {
    hours.to_f64().unwrap_or_default()
}
