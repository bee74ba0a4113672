use crate::error::FlexsheetError;
use crate::extraction::TextFragment;
use crate::model::TimesheetEntry;
use crate::parsing::values::parse_hours;

pub const TABLE_START_LABEL: &str = "Qty.";
pub const TABLE_END_LABEL: &str = "Total Hours";

/// Read (day, name, hours) triples between the "Qty." header and "Total Hours".
///
/// A page without a "Qty." header has no entries. Once the header is found,
/// the table must end with "Total Hours" on a triple boundary; running off the
/// end of the page instead is a `MalformedLayout` error.
pub fn extract_timesheet(fragments: &[TextFragment]) -> Result<Vec<TimesheetEntry>, FlexsheetError> {
    let Some(start) = fragments.iter().position(|f| f.text == TABLE_START_LABEL) else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    let mut index = start + 1;
    loop {
        let Some(day) = fragments.get(index) else {
            return Err(FlexsheetError::MalformedLayout(format!(
                "'{TABLE_END_LABEL}' not found after {} timesheet row(s)",
                entries.len()
            )));
        };
        if day.text == TABLE_END_LABEL {
            break;
        }

        let (Some(name), Some(hours)) = (fragments.get(index + 1), fragments.get(index + 2)) else {
            return Err(FlexsheetError::MalformedLayout(format!(
                "incomplete timesheet row starting at '{}'",
                day.text
            )));
        };

        entries.push(TimesheetEntry {
            day: day.text.clone(),
            name: name.text.clone(),
            hours: parse_hours(&hours.text)?,
        });
        index += 3;
    }

    tracing::debug!(rows = entries.len(), "timesheet table read");
    Ok(entries)
}
