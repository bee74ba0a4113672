use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the timesheet table: day, activity name and hours booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    pub day: String,
    pub name: String,
    pub hours: Decimal,
}

/// Project reference from the "Project name" field, optionally carrying a WBS code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) if self.name.is_empty() => write!(f, "{code}"),
            Some(code) => write!(f, "{code}: {}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Everything extracted from the first page of a timesheet form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub consultant_name: String,
    pub company_name: String,
    /// Display range, e.g. "01/02/2024 - 29/02/2024".
    pub period: String,
    /// "yyyy-MM" key of the same month.
    pub year_month: String,
    pub project: ProjectRef,
    pub timesheet: Vec<TimesheetEntry>,
}

impl DocumentRecord {
    pub fn total_hours(&self) -> Decimal {
        self.timesheet.iter().map(|e| e.hours).sum()
    }
}

/// Hours aggregated per activity, attributed to a project code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub name: String,
    pub code: String,
    pub hours: Decimal,
}

/// Position of the customer signature box in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}
