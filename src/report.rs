//! Building the end-of-run report from the failure log.

use crate::config::RunConfig;
use crate::failures::FailureLog;
use crate::formatter::{format_failure, format_summary, paint, GREEN, RED};

/// Rendered outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReport {
    pub text: String,
    pub success: bool,
}

impl SpecReport {
    /// Process exit status for this outcome (0 = pass, 1 = failures).
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}

/// Render every recorded failure in order, or the success summary when
/// there are none.
pub fn build_report(log: &FailureLog, config: &RunConfig) -> SpecReport {
    if log.is_empty() {
        return SpecReport {
            text: paint(&format_summary(log.examples()), GREEN, config.color),
            success: true,
        };
    }

    let body: String = log.iter().map(format_failure).collect();
    SpecReport {
        text: paint(&body, RED, config.color),
        success: false,
    }
}
