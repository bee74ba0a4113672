use chrono::{Datelike, Months, NaiveDate};

/// Parse a "MM/yyyy" label value into the first day of that month.
///
/// Accepts a one- or two-digit month (1-12) and a four-digit year, with
/// surrounding whitespace. Anything else yields `None`.
pub fn parse_month_year(s: &str) -> Option<NaiveDate> {
    let (month, year) = s.trim().split_once('/')?;
    if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Render the month starting at `first_of_month` as "dd/MM/yyyy - dd/MM/yyyy".
pub fn format_range(first_of_month: NaiveDate) -> String {
    let last = last_day_of_month(first_of_month);
    format!(
        "{} - {}",
        first_of_month.format("%d/%m/%Y"),
        last.format("%d/%m/%Y")
    )
}

/// Display range of the whole month containing `date`.
pub fn period_for_date(date: NaiveDate) -> String {
    format_range(date.with_day(1).unwrap_or(date))
}

/// "yyyy-MM" key of the month containing `date`.
pub fn year_month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month_year() {
        assert_eq!(parse_month_year("02/2024"), Some(date(2024, 2, 1)));
        assert_eq!(parse_month_year(" 2/2024 "), Some(date(2024, 2, 1)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_month_year("not-a-date"), None);
        assert_eq!(parse_month_year("13/2024"), None);
        assert_eq!(parse_month_year("00/2024"), None);
        assert_eq!(parse_month_year("02/24"), None);
        assert_eq!(parse_month_year("/2024"), None);
        assert_eq!(parse_month_year("02/2024/01"), None);
        assert_eq!(parse_month_year(""), None);
    }

    #[test]
    fn test_format_range_leap_year() {
        assert_eq!(format_range(date(2024, 2, 1)), "01/02/2024 - 29/02/2024");
        assert_eq!(format_range(date(2023, 2, 1)), "01/02/2023 - 28/02/2023");
    }

    #[test]
    fn test_format_range_december() {
        assert_eq!(format_range(date(2023, 12, 1)), "01/12/2023 - 31/12/2023");
    }

    #[test]
    fn test_period_for_mid_month_date() {
        assert_eq!(period_for_date(date(2024, 4, 17)), "01/04/2024 - 30/04/2024");
    }

    #[test]
    fn test_year_month_key() {
        assert_eq!(year_month_key(date(2024, 2, 1)), "2024-02");
        assert_eq!(year_month_key(date(2023, 11, 30)), "2023-11");
    }
}
