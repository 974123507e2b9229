//! Quick fixes for diagnosed patterns.
//!
//! A fix describes an action the user can take. File actions run through
//! [`FixApplier`]; command and navigation actions only hand their payload
//! back to the caller. Nothing in this module ever spawns a process.

mod apply;
mod catalog;

pub use apply::{ApplyOptions, ApplyOutcome, FixApplier};
pub use catalog::FixCatalog;

use serde::{Deserialize, Serialize};

/// A single actionable remedy tied to a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pattern_id: String,
    pub action: FixAction,
    /// Destructive or build-affecting fixes want an explicit go-ahead
    pub requires_confirmation: bool,
}

/// What applying a fix does. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FixAction {
    FileCreate {
        path: String,
        contents: String,
    },
    FileModify {
        path: String,
        transform: ContentTransform,
    },
    FileDelete {
        path: String,
    },
    /// A shell command handed back for the user to run, never executed here
    TerminalCommand {
        command: String,
    },
    /// A URL handed back for the host to open
    ExternalNavigation {
        url: String,
    },
}

/// Deterministic text transforms for file-modify fixes.
///
/// Applying a transform twice yields the same text as applying it once.
/// `ReplaceAll` keeps that promise only while `to` does not contain `from`;
/// catalog registration rejects entries that would break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentTransform {
    /// Replace the whole file body
    SetContent { content: String },
    /// Append `line` unless it is already present as a full line
    EnsureLine { line: String },
    /// Replace every occurrence of `from` with `to`
    ReplaceAll { from: String, to: String },
    /// Drop every line containing `needle`
    RemoveLines { needle: String },
}

impl ContentTransform {
    pub fn apply(&self, input: &str) -> String {
        match self {
            ContentTransform::SetContent { content } => content.clone(),
            ContentTransform::EnsureLine { line } => {
                if input.lines().any(|l| l == line) {
                    input.to_string()
                } else if input.is_empty() {
                    format!("{line}\n")
                } else if input.ends_with('\n') {
                    format!("{input}{line}\n")
                } else {
                    format!("{input}\n{line}\n")
                }
            }
            ContentTransform::ReplaceAll { from, to } => {
                if from.is_empty() {
                    input.to_string()
                } else {
                    input.replace(from.as_str(), to)
                }
            }
            ContentTransform::RemoveLines { needle } => {
                let kept: Vec<&str> = input
                    .lines()
                    .filter(|line| !line.contains(needle.as_str()))
                    .collect();
                let mut out = kept.join("\n");
                if input.ends_with('\n') && !out.is_empty() {
                    out.push('\n');
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(transform: &ContentTransform, input: &str) {
        let once = transform.apply(input);
        let twice = transform.apply(&once);
        assert_eq!(once, twice, "transform not idempotent on {input:?}");
    }

    #[test]
    fn set_content_overwrites_and_settles() {
        let t = ContentTransform::SetContent {
            content: "fresh\n".to_string(),
        };
        assert_eq!(t.apply("old stuff"), "fresh\n");
        assert_idempotent(&t, "old stuff");
    }

    #[test]
    fn ensure_line_appends_exactly_once() {
        let t = ContentTransform::EnsureLine {
            line: "node_modules/".to_string(),
        };

        assert_eq!(t.apply(""), "node_modules/\n");
        assert_eq!(t.apply("dist/\n"), "dist/\nnode_modules/\n");
        assert_eq!(t.apply("dist/"), "dist/\nnode_modules/\n");
        assert_eq!(t.apply("node_modules/\n"), "node_modules/\n");
        assert_idempotent(&t, "dist/\n");
        assert_idempotent(&t, "");
    }

    #[test]
    fn ensure_line_ignores_partial_line_matches() {
        let t = ContentTransform::EnsureLine {
            line: "18".to_string(),
        };
        // "18" embedded in another line does not count as present
        assert_eq!(t.apply("node-18-alpine\n"), "node-18-alpine\n18\n");
    }

    #[test]
    fn replace_all_touches_every_occurrence() {
        let t = ContentTransform::ReplaceAll {
            from: "npm ci".to_string(),
            to: "pnpm install --frozen-lockfile".to_string(),
        };

        let input = "preBuild:\n  - npm ci\nbuild:\n  - npm ci && npm run build\n";
        let output = t.apply(input);
        assert!(!output.contains("npm ci"));
        assert_eq!(output.matches("pnpm install --frozen-lockfile").count(), 2);
        assert_idempotent(&t, input);
    }

    #[test]
    fn remove_lines_drops_matching_lines_only() {
        let t = ContentTransform::RemoveLines {
            needle: "package-lock.json".to_string(),
        };

        let input = "dist/\npackage-lock.json\nnode_modules/\n";
        assert_eq!(t.apply(input), "dist/\nnode_modules/\n");
        assert_idempotent(&t, input);
    }

    #[test]
    fn remove_lines_can_empty_a_file() {
        let t = ContentTransform::RemoveLines {
            needle: "only".to_string(),
        };
        assert_eq!(t.apply("only line\n"), "");
        assert_idempotent(&t, "only line\n");
    }

    #[test]
    fn fix_action_serializes_with_kind_tag() {
        let action = FixAction::FileDelete {
            path: "package-lock.json".to_string(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "fileDelete");
        assert_eq!(json["path"], "package-lock.json");
    }
}
