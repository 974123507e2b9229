//! Unified scanning for regex and literal patterns.
//!
//! Both pattern kinds produce the same [`MatchResult`] shape: every
//! non-overlapping occurrence in document order, with capture groups for
//! regex patterns. Pattern problems (an expression that no longer compiles)
//! are reported inside the result instead of aborting the scan.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::types::{MatchResult, Pattern, PatternMatch};

/// Compile a regex expression the way scans will run it
pub fn compile_expression(
    expr: &str,
    case_sensitive: bool,
) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(expr)
        .case_insensitive(!case_sensitive)
        .build()
}

/// Scan `text` with a single pattern
pub fn run(pattern: &Pattern, text: &str) -> MatchResult {
    let result = if pattern.is_regex {
        run_regex(pattern, text)
    } else {
        run_literal(pattern, text)
    };

    debug!(
        pattern_id = %result.pattern_id,
        matches = result.matches.len(),
        failed = result.error.is_some(),
        "pattern scan finished"
    );
    result
}

fn run_regex(pattern: &Pattern, text: &str) -> MatchResult {
    let regex = match compile_expression(&pattern.pattern, pattern.case_sensitive) {
        Ok(regex) => regex,
        Err(e) => {
            return MatchResult::failed(
                pattern.id.clone(),
                format!("invalid regular expression: {e}"),
            );
        }
    };

    let names: Vec<&str> = regex.capture_names().flatten().collect();
    let mut matches = Vec::new();
    let mut at = 0usize;

    while at <= text.len() {
        let Some(caps) = regex.captures_at(text, at) else {
            break;
        };
        let Some(full) = caps.get(0) else {
            break;
        };

        let groups = (1..caps.len())
            .map(|i| caps.get(i).map(|g| g.as_str().to_string()))
            .collect();
        let named_groups: BTreeMap<String, String> = names
            .iter()
            .copied()
            .filter_map(|name| {
                caps.name(name)
                    .map(|g| (name.to_string(), g.as_str().to_string()))
            })
            .collect();

        matches.push(PatternMatch {
            text: full.as_str().to_string(),
            offset: full.start(),
            groups,
            named_groups,
        });

        if full.end() > full.start() {
            at = full.end();
        } else {
            // Zero-width match: step over one character so the scan cannot stall
            match text[full.end()..].chars().next() {
                Some(c) => at = full.end() + c.len_utf8(),
                None => break,
            }
        }
    }

    MatchResult {
        pattern_id: pattern.id.clone(),
        matches,
        error: None,
    }
}

fn run_literal(pattern: &Pattern, text: &str) -> MatchResult {
    let needle = pattern.pattern.as_str();
    let mut matches = Vec::new();

    if !needle.is_empty() {
        if pattern.case_sensitive {
            let mut at = 0usize;
            while let Some(found) = text[at..].find(needle) {
                let start = at + found;
                let end = start + needle.len();
                matches.push(literal_match(&text[start..end], start));
                at = end;
            }
        } else {
            // Case folding is ASCII-only. A byte window that folds equal to a
            // valid UTF-8 needle always lines up with character boundaries,
            // so slicing the original text here is safe.
            let hay = text.as_bytes();
            let nee = needle.as_bytes();
            let mut at = 0usize;
            while at + nee.len() <= hay.len() {
                if hay[at..at + nee.len()].eq_ignore_ascii_case(nee) {
                    matches.push(literal_match(&text[at..at + nee.len()], at));
                    at += nee.len();
                } else {
                    at += 1;
                }
            }
        }
    }

    MatchResult {
        pattern_id: pattern.id.clone(),
        matches,
        error: None,
    }
}

fn literal_match(text: &str, offset: usize) -> PatternMatch {
    PatternMatch {
        text: text.to_string(),
        offset,
        groups: Vec::new(),
        named_groups: BTreeMap::new(),
    }
}
