//! Text rendering for spec reports.

use crate::failures::FailureRecord;
use std::fmt::Write;

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const RESET: &str = "\x1b[0m";

const INDENT: &str = "  ";

/// Render one failure: its breadcrumb as an indented outline, then the
/// example, the matcher message and the call site.
pub fn format_failure(record: &FailureRecord) -> String {
    let mut output = String::new();

    for (depth, description) in record.breadcrumb.iter().enumerate() {
        writeln!(output, "{}- {}", INDENT.repeat(depth), description).unwrap();
    }

    let depth = record.breadcrumb.len();
    writeln!(output, "{}  {}", INDENT.repeat(depth), record.example).unwrap();
    writeln!(output).unwrap();

    write!(output, "{}\n\t{}\n", record.message, record.location).unwrap();

    output
}

/// Summary line for a run without failures.
pub fn format_summary(examples: usize) -> String {
    format!("All tests passed. {} examples. 0 failures.\n", examples)
}

/// Wrap `text` in `color` and a reset escape, or return it unchanged.
pub fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}
