pub mod naming;
pub mod stamp;
pub mod xlsx;

use chrono::NaiveDate;

/// Who approved the timesheet, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub manager: String,
    pub date: NaiveDate,
}

impl Approval {
    /// "yyyy-MM-dd manager", as printed under the signature.
    pub fn caption(&self) -> String {
        format!("{} {}", self.date.format("%Y-%m-%d"), self.manager)
            .trim_end()
            .to_string()
    }
}
