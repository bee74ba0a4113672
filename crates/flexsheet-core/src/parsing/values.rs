use crate::error::FlexsheetError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse the hours column of a timesheet row.
///
/// Reads the longest leading number and ignores whatever follows it.
/// Handles formats like:
/// - "8" -> 8
/// - "7.5" -> 7.5
/// - "7,5" -> 7.5 (decimal comma)
/// - "8h", "7,5 hrs" -> 8, 7.5
/// - "-2" -> -2 (sign is not checked here)
///
/// Text with no leading number at all means the row triple is out of step
/// with the layout and is reported as `MalformedLayout`.
pub fn parse_hours(s: &str) -> Result<Decimal, FlexsheetError> {
    let trimmed = s.trim();
    let prefix = numeric_prefix(trimmed).ok_or_else(|| {
        FlexsheetError::MalformedLayout(format!("invalid hours '{}': no leading number", trimmed))
    })?;
    Decimal::from_str(&prefix).map_err(|e| {
        FlexsheetError::MalformedLayout(format!("invalid hours '{}': {}", trimmed, e))
    })
}

/// Leading `[+-]digits[(.|,)digits]` of `s`, normalised to "-12.5" form.
fn numeric_prefix(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if matches!(bytes.get(i), Some(b'.') | Some(b',')) {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        frac_part = &s[frac_start..j];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}
