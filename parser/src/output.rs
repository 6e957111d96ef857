//! @ai:module:intent Format output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_table, format_scan_result, to_json
//! @ai:module:depends_on scan, table, value
//! @ai:module:stateless true

use crate::scan::ScanResult;
use crate::table::AnnotationTable;
use crate::value::AnnotationValue;
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format one annotation table as a string
/// @ai:effects pure
pub fn format_table(table: &AnnotationTable, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(table, false),
        OutputFormat::JsonPretty => to_json(table, true),
        OutputFormat::Text => format_table_text(table, ""),
    }
}

/// @ai:intent Format one annotation table as indented text lines
/// @ai:effects pure
fn format_table_text(table: &AnnotationTable, indent: &str) -> String {
    let mut output = String::new();

    if table.is_empty() {
        output.push_str(&format!("{}{}\n", indent, "(no annotations)".dimmed()));
    }

    for (name, value) in table.iter() {
        output.push_str(&format!(
            "{}{} {}\n",
            indent,
            format!("@{}", name).cyan(),
            render_value(value)
        ));
    }

    for invalid in table.invalid_values() {
        output.push_str(&format!(
            "{}{} @{} line {}: {}\n",
            indent,
            "invalid:".yellow(),
            invalid.annotation,
            invalid.line,
            invalid.message
        ));
    }

    output
}

/// @ai:intent Render a value compactly: strings bare, everything else as JSON
/// @ai:example (Str("is awesome!")) -> "is awesome!"
/// @ai:example (List[1, 2]) -> "[1,2]"
/// @ai:effects pure
fn render_value(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Str(s) => s.clone(),
        other => to_json(other, false),
    }
}

/// @ai:intent Format scan results as a string
/// @ai:effects pure
pub fn format_scan_result(result: &ScanResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(result, false),
        OutputFormat::JsonPretty => to_json(result, true),
        OutputFormat::Text => format_scan_result_text(result),
    }
}

/// @ai:intent Format scan results as human-readable text
/// @ai:effects pure
fn format_scan_result_text(result: &ScanResult) -> String {
    let mut output = String::new();

    for item in &result.items {
        output.push_str(&format!(
            "{} {} {}\n",
            item.name.bold(),
            format!("({})", item.kind).dimmed(),
            item.location.to_string().dimmed()
        ));
        output.push_str(&format_table_text(&item.annotations, "  "));
    }

    for failure in &result.failures {
        output.push_str(&format!(
            "{} {} - {}: {}\n",
            "ERROR".red().bold(),
            failure.location.to_string().dimmed(),
            failure.subject,
            failure.message
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Scanned {} files, {} declarations, {} annotated\n",
        result.files_scanned,
        result.declarations_scanned,
        result.items.len()
    ));

    if result.passed() {
        output.push_str(&format!("{} No failures\n", "OK".green().bold()));
    } else {
        output.push_str(&format!(
            "{} failures\n",
            result.failures.len().to_string().red().bold()
        ));
    }

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
