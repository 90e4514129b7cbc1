//! Recorded assertion failures for a run.

use serde::{Deserialize, Serialize};

/// A single failed expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Rendered matcher message, e.g. `"expected: 23\n got: 24\n"`.
    pub message: String,
    /// Description of the example that was running.
    pub example: String,
    /// Enclosing block descriptions at the time of failure, outermost first.
    pub breadcrumb: Vec<String>,
    /// `file:line` of the matcher call.
    pub location: String,
}

/// Append-only log of failures plus the count of examples executed.
///
/// Both are cleared together by [`FailureLog::reset`].
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    records: Vec<FailureRecord>,
    examples: usize,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn record(&mut self, record: FailureRecord) {
        self.records.push(record);
    }

    /// Count one more executed example.
    pub fn record_example(&mut self) {
        self.examples += 1;
    }

    /// Failures in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, FailureRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of examples executed since the last reset.
    pub fn examples(&self) -> usize {
        self.examples
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.examples = 0;
    }
}

impl<'a> IntoIterator for &'a FailureLog {
    type Item = &'a FailureRecord;
    type IntoIter = std::slice::Iter<'a, FailureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
