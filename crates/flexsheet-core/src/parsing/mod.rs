pub mod name;
pub mod period;
pub mod project;
pub mod timesheet;
pub mod values;
pub mod wbs;

use chrono::NaiveDate;

use crate::error::FlexsheetError;
use crate::extraction::TextFragment;
use crate::layout::value_after;
use crate::model::{DocumentRecord, ProjectRef};
use name::friendly_name;
use period::{parse_month_year, period_for_date, year_month_key};
use project::parse_project_name;
use timesheet::extract_timesheet;

pub const NAME_LABEL: &str = "Name & PO No.";
pub const PROJECT_LABEL: &str = "Project name";
pub const PERIOD_LABEL: &str = "Month/Year";

pub const INVALID_NAME: &str = "Invalid name";
pub const INVALID_PROJECT_NAME: &str = "Invalid project name";

/// Company line printed on every output; the form itself does not carry it.
pub const DEFAULT_COMPANY_NAME: &str = "Tobania (host) / Codifly (employer)";

/// Inputs to field extraction that do not come from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub company_name: String,
    /// Fallback month when the "Month/Year" field is missing or unreadable.
    pub today: NaiveDate,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            today: chrono::Local::now().date_naive(),
        }
    }
}

/// Build a [`DocumentRecord`] from fragments already in reading order.
///
/// Missing or unreadable fields fall back to sentinels ("Invalid name",
/// "Invalid project name", the month of `options.today`); only a broken
/// timesheet table is an error.
pub fn parse_document(
    fragments: &[TextFragment],
    options: &ExtractOptions,
) -> Result<DocumentRecord, FlexsheetError> {
    let first_day = extract_first_day_of_month(fragments, options.today);

    Ok(DocumentRecord {
        consultant_name: extract_name(fragments),
        company_name: options.company_name.clone(),
        period: period_for_date(first_day),
        year_month: year_month_key(first_day),
        project: extract_project(fragments),
        timesheet: extract_timesheet(fragments)?,
    })
}

pub fn extract_name(fragments: &[TextFragment]) -> String {
    match value_after(NAME_LABEL, fragments) {
        Some(value) => friendly_name(value),
        None => {
            tracing::warn!("no value after '{NAME_LABEL}', using placeholder");
            INVALID_NAME.to_string()
        }
    }
}

pub fn extract_project(fragments: &[TextFragment]) -> ProjectRef {
    match value_after(PROJECT_LABEL, fragments) {
        Some(value) => parse_project_name(value),
        None => {
            tracing::warn!("no value after '{PROJECT_LABEL}', using placeholder");
            ProjectRef {
                name: INVALID_PROJECT_NAME.to_string(),
                code: None,
            }
        }
    }
}

/// First day of the reported month, or of `today`'s month if it cannot be read.
pub fn extract_first_day_of_month(fragments: &[TextFragment], today: NaiveDate) -> NaiveDate {
    let parsed = value_after(PERIOD_LABEL, fragments).and_then(parse_month_year);
    parsed.unwrap_or_else(|| {
        tracing::warn!(%today, "no readable '{PERIOD_LABEL}' value, using current month");
        today
    })
}

/// Display period ("dd/MM/yyyy - dd/MM/yyyy") of the reported month.
pub fn extract_period(fragments: &[TextFragment], today: NaiveDate) -> String {
    period_for_date(extract_first_day_of_month(fragments, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(texts: &[&str]) -> Vec<TextFragment> {
        texts
            .iter()
            .map(|t| TextFragment::at(*t, 0.0, 0.0, 10.0, 8.0))
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name(&seq(&["Name & PO No.", "Doe, Jane"])), "Jane Doe");
        assert_eq!(extract_name(&seq(&["Name", "Doe, Jane"])), INVALID_NAME);
    }

    #[test]
    fn test_extract_project_fallback() {
        let p = extract_project(&seq(&["Project name"]));
        assert_eq!(p.name, INVALID_PROJECT_NAME);
        assert_eq!(p.code, None);
    }

    #[test]
    fn test_extract_period() {
        let fragments = seq(&["Month/Year", "02/2024"]);
        assert_eq!(extract_period(&fragments, today()), "01/02/2024 - 29/02/2024");
    }

    #[test]
    fn test_period_falls_back_to_today() {
        let fragments = seq(&["Month/Year", "soon"]);
        assert_eq!(extract_period(&fragments, today()), "01/10/2026 - 31/10/2026");
        assert_eq!(extract_period(&[], today()), "01/10/2026 - 31/10/2026");
    }

    #[test]
    fn test_parse_document_year_month_follows_period() {
        let options = ExtractOptions {
            company_name: "ACME".into(),
            today: today(),
        };
        let doc = parse_document(&seq(&["Month/Year", "11/2023"]), &options).unwrap();
        assert_eq!(doc.year_month, "2023-11");
        assert_eq!(doc.period, "01/11/2023 - 30/11/2023");
        assert_eq!(doc.company_name, "ACME");
        assert!(doc.timesheet.is_empty());

        let fallback = parse_document(&[], &options).unwrap();
        assert_eq!(fallback.year_month, "2026-10");
    }
}
