use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pattern::PatternId;

/// A single occurrence of a pattern in the scanned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    /// Matched text as it appears in the input
    pub text: String,
    /// Byte offset of the match in the scanned text
    pub offset: usize,
    /// Positional capture groups, `None` for groups that did not participate.
    /// Always empty for literal patterns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Option<String>>,
    /// Named capture groups that participated in the match
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named_groups: BTreeMap<String, String>,
}

/// Outcome of scanning one text with one pattern.
///
/// A broken pattern never aborts a scan; it reports itself through `error`
/// and contributes no matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub pattern_id: PatternId,
    #[serde(default)]
    pub matches: Vec<PatternMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchResult {
    pub fn failed(pattern_id: impl Into<PatternId>, message: impl Into<String>) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            matches: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// True when the scan succeeded and found at least one occurrence
    pub fn is_match(&self) -> bool {
        self.error.is_none() && !self.matches.is_empty()
    }

    /// Offset of the earliest occurrence, if any
    pub fn first_offset(&self) -> Option<usize> {
        self.matches.first().map(|m| m.offset)
    }
}
