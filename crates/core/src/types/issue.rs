use serde::{Deserialize, Serialize};

use super::pattern::{Category, PatternId};

/// An excerpt of the scanned log backing up a diagnosed issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub excerpt: String,
    /// Byte offset of the occurrence in the scanned text
    pub offset: usize,
}

/// A diagnosed problem: one matched pattern plus its explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub pattern_id: PatternId,
    pub pattern_name: String,
    pub category: Category,
    pub root_cause: String,
    pub suggested_fixes: Vec<String>,
    pub evidence: Vec<Evidence>,
}

impl Issue {
    /// Offset of the earliest piece of evidence, used for ranking ties
    pub fn first_offset(&self) -> usize {
        self.evidence.first().map(|e| e.offset).unwrap_or(usize::MAX)
    }
}

/// A pattern that could not be evaluated during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternError {
    pub pattern_id: PatternId,
    pub pattern_name: String,
    pub message: String,
}

/// Aggregated result of scanning a log with every enabled pattern.
///
/// `issues` is sorted most severe first; ties within a category go to the
/// issue whose first occurrence appears earliest in the log. `pattern_errors`
/// lists patterns that failed to evaluate, so an empty `issues` with a
/// non-empty `pattern_errors` is distinguishable from a genuinely clean log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_errors: Vec<PatternError>,
}

impl Diagnosis {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.pattern_errors.is_empty()
    }
}
