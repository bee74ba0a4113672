use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::model::{DocumentRecord, SummaryEntry};
use crate::parsing::wbs;

pub const UNKNOWN_CODE: &str = "unknown";

const KEY_SEPARATOR: &str = " - ";

/// Sum hours per timesheet activity and attribute each to a project code.
///
/// Groups keep the order in which their name first appears. Names of the form
/// "<text> - <WBS code>..." carry their own code; every other group is booked
/// on the document's project (or "unknown" when it has no code).
pub fn create_summary(document: &DocumentRecord) -> Vec<SummaryEntry> {
    let mut groups: Vec<(&str, Decimal)> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for entry in &document.timesheet {
        match index_of.get(entry.name.as_str()) {
            Some(&i) => groups[i].1 += entry.hours,
            None => {
                index_of.insert(entry.name.as_str(), groups.len());
                groups.push((entry.name.as_str(), entry.hours));
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, hours)| summary_entry(document, key, hours))
        .collect()
}

fn summary_entry(document: &DocumentRecord, key: &str, hours: Decimal) -> SummaryEntry {
    if let Some((name, code)) = split_key(key) {
        return SummaryEntry {
            name: name.to_string(),
            code: code.to_string(),
            hours,
        };
    }

    let project = &document.project;
    SummaryEntry {
        name: if project.name.is_empty() {
            key.to_string()
        } else {
            project.name.clone()
        },
        code: project
            .code
            .clone()
            .unwrap_or_else(|| UNKNOWN_CODE.to_string()),
        hours,
    }
}

/// Split "<name> - <WBS code><rest>" at the rightmost separator that is
/// followed by a code. The code part keeps any trailing text.
fn split_key(key: &str) -> Option<(&str, &str)> {
    key.rmatch_indices(KEY_SEPARATOR)
        .map(|(at, sep)| (at, at + sep.len()))
        .find(|&(at, code_start)| at > 0 && wbs::code_len_at(key, code_start).is_some())
        .map(|(at, code_start)| (&key[..at], &key[code_start..]))
}
