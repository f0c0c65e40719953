//! Output formatter trait

use super::console::ConsoleFormatter;
use super::report::RoundReport;

/// Trait for formatting round results
pub trait OutputFormatter {
    fn format(&self, report: &RoundReport) -> String;
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &RoundReport) -> String {
        Self::format(report)
    }
}

/// Pretty-printed JSON of the whole report
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RoundReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }
}
