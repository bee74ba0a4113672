use flexsheet_core::model::{DocumentRecord, SummaryEntry};

pub fn print_document(document: &DocumentRecord) {
    println!("=== {} ===\n", document.consultant_name);
    println!("  Company: {}", document.company_name);
    println!("  Period:  {}", document.period);
    println!("  Project: {}", document.project);
    println!();

    if document.timesheet.is_empty() {
        println!("  (no timesheet rows)");
        return;
    }

    let max_name = document
        .timesheet
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(10)
        .max("Activity".len());

    println!("  {:<5} {:<width$}  {:>7}", "Day", "Activity", "Hours", width = max_name);
    for entry in &document.timesheet {
        println!(
            "  {:<5} {:<width$}  {:>7}",
            entry.day,
            entry.name,
            entry.hours.to_string(),
            width = max_name
        );
    }
    println!(
        "  {:<5} {:<width$}  {:>7}",
        "",
        "Total",
        document.total_hours().to_string(),
        width = max_name
    );
}

pub fn print_summary(document: &DocumentRecord, summary: &[SummaryEntry]) {
    println!("=== {} ({}) ===\n", document.consultant_name, document.year_month);

    if summary.is_empty() {
        println!("  (no hours booked)");
        return;
    }

    let max_name = summary
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(10);
    let max_code = summary
        .iter()
        .map(|s| s.code.chars().count())
        .max()
        .unwrap_or(4);

    for entry in summary {
        println!(
            "  {:<name_w$}  {:<code_w$}  {:>7}",
            entry.name,
            entry.code,
            entry.hours.to_string(),
            name_w = max_name,
            code_w = max_code
        );
    }
    println!("\n  Total: {}", document.total_hours());
}
