use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a failure pattern.
///
/// Built-in patterns use stable SCREAMING_SNAKE identifiers such as
/// `LOCK_FILE_MISMATCH`; user-defined patterns get a generated UUID.
pub type PatternId = String;

/// Severity bucket a pattern classifies its findings into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Warning,
    Info,
}

impl Category {
    /// Sort rank, lower is more severe
    pub fn rank(self) -> u8 {
        match self {
            Category::Error => 0,
            Category::Warning => 1,
            Category::Info => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Info => "info",
        }
    }
}

/// A failure pattern: how to match build-log text and what the match means.
///
/// This is also the persisted record shape, so field names stay camelCase
/// on the wire and unknown optional fields round-trip as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: PatternId,
    pub name: String,
    /// Regex source or literal needle, depending on `is_regex`
    pub pattern: String,
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    pub category: Category,
    pub root_cause: String,
    #[serde(default)]
    pub suggested_fixes: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_matched: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl Pattern {
    /// Bump the match counter and stamp the last-match time
    pub fn record_match(&mut self, at: DateTime<Utc>) {
        self.match_count = Some(self.match_count.unwrap_or(0) + 1);
        self.last_matched = Some(at);
    }
}
