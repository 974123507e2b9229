//! Diagnosis: scan a log with every enabled pattern and rank the findings.

use tracing::debug;

use crate::error::Result;
use crate::matcher;
use crate::registry::PatternRegistry;
use crate::types::{Diagnosis, Evidence, Issue, PatternError};
use crate::util;

/// At most this many occurrences are kept as evidence per issue
const MAX_EVIDENCE: usize = 5;
/// Evidence excerpts are clipped to this many characters
const MAX_EXCERPT_CHARS: usize = 160;

/// Scan `text` with every enabled pattern in `registry`.
///
/// Issues come back sorted error before warning before info; ties within a
/// category go to the issue whose first occurrence appears earliest in the
/// log. Patterns that fail to evaluate are collected in `pattern_errors`
/// instead of aborting the batch. Match counters for patterns that fired
/// are updated and persisted before returning.
pub fn diagnose(registry: &mut PatternRegistry, text: &str) -> Result<Diagnosis> {
    let enabled: Vec<_> = registry.list_enabled().into_iter().cloned().collect();
    debug!(patterns = enabled.len(), bytes = text.len(), "diagnosis started");

    let mut issues = Vec::new();
    let mut pattern_errors = Vec::new();
    let mut matched_ids = Vec::new();

    for pattern in &enabled {
        let result = matcher::run(pattern, text);
        if let Some(message) = result.error {
            pattern_errors.push(PatternError {
                pattern_id: pattern.id.clone(),
                pattern_name: pattern.name.clone(),
                message,
            });
            continue;
        }
        if result.matches.is_empty() {
            continue;
        }

        let evidence = result
            .matches
            .iter()
            .take(MAX_EVIDENCE)
            .map(|m| Evidence {
                excerpt: util::truncate_chars(&m.text, MAX_EXCERPT_CHARS),
                offset: m.offset,
            })
            .collect();

        issues.push(Issue {
            pattern_id: pattern.id.clone(),
            pattern_name: pattern.name.clone(),
            category: pattern.category,
            root_cause: pattern.root_cause.clone(),
            suggested_fixes: pattern.suggested_fixes.clone(),
            evidence,
        });
        matched_ids.push(pattern.id.clone());
    }

    issues.sort_by_key(|issue| (issue.category.rank(), issue.first_offset()));
    registry.record_matches(&matched_ids)?;

    debug!(
        issues = issues.len(),
        failed_patterns = pattern_errors.len(),
        "diagnosis finished"
    );
    Ok(Diagnosis {
        issues,
        pattern_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Pattern};

    fn needle(id: &str, text: &str, category: Category) -> Pattern {
        Pattern {
            id: id.to_string(),
            name: id.to_string(),
            pattern: text.to_string(),
            is_regex: false,
            case_sensitive: true,
            category,
            root_cause: format!("{id} happened"),
            suggested_fixes: vec![format!("fix {id}")],
            enabled: true,
            match_count: None,
            last_matched: None,
        }
    }

    #[test]
    fn errors_outrank_earlier_warnings() {
        let mut registry = PatternRegistry::from_patterns(vec![
            needle("early-warning", "deprecation notice", Category::Warning),
            needle("late-error", "heap exhausted", Category::Error),
        ]);

        let log = "deprecation notice right away\nmuch later: heap exhausted";
        let diagnosis = diagnose(&mut registry, log).unwrap();

        let order: Vec<&str> = diagnosis
            .issues
            .iter()
            .map(|i| i.pattern_id.as_str())
            .collect();
        assert_eq!(order, vec!["late-error", "early-warning"]);
    }

    #[test]
    fn ties_within_a_category_go_to_the_earlier_offset() {
        let mut registry = PatternRegistry::from_patterns(vec![
            needle("second", "beta", Category::Error),
            needle("first", "alpha", Category::Error),
        ]);

        let diagnosis = diagnose(&mut registry, "alpha then beta").unwrap();
        let order: Vec<&str> = diagnosis
            .issues
            .iter()
            .map(|i| i.pattern_id.as_str())
            .collect();
        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn broken_pattern_is_reported_and_the_rest_still_run() {
        let mut broken = needle("broken", "(oops", Category::Error);
        broken.is_regex = true;
        let mut registry = PatternRegistry::from_patterns(vec![
            broken,
            needle("works", "npm ERR!", Category::Error),
        ]);

        let diagnosis = diagnose(&mut registry, "npm ERR! something").unwrap();

        assert_eq!(diagnosis.issues.len(), 1);
        assert_eq!(diagnosis.issues[0].pattern_id, "works");
        assert_eq!(diagnosis.pattern_errors.len(), 1);
        assert_eq!(diagnosis.pattern_errors[0].pattern_id, "broken");
        assert!(!diagnosis.is_clean());
    }

    #[test]
    fn disabled_patterns_never_run() {
        let mut disabled = needle("off", "(also broken", Category::Error);
        disabled.is_regex = true;
        disabled.enabled = false;
        let mut registry = PatternRegistry::from_patterns(vec![disabled]);

        let diagnosis = diagnose(&mut registry, "whatever").unwrap();
        assert!(diagnosis.is_clean());
    }

    #[test]
    fn clean_log_produces_clean_diagnosis() {
        let mut registry = PatternRegistry::new();
        let diagnosis = diagnose(&mut registry, "Compiled without problems").unwrap();
        assert!(diagnosis.is_clean());
    }

    #[test]
    fn counters_reflect_each_diagnosis_round() {
        let mut registry =
            PatternRegistry::from_patterns(vec![needle("counted", "boom", Category::Error)]);

        diagnose(&mut registry, "boom boom").unwrap();
        assert_eq!(registry.get("counted").unwrap().match_count, Some(1));

        diagnose(&mut registry, "boom again").unwrap();
        assert_eq!(registry.get("counted").unwrap().match_count, Some(2));

        diagnose(&mut registry, "nothing here").unwrap();
        assert_eq!(registry.get("counted").unwrap().match_count, Some(2));
    }

    #[test]
    fn evidence_is_capped_and_excerpts_clipped() {
        let mut registry =
            PatternRegistry::from_patterns(vec![needle("many", "hit", Category::Info)]);

        let log = "hit ".repeat(12);
        let diagnosis = diagnose(&mut registry, &log).unwrap();
        assert_eq!(diagnosis.issues[0].evidence.len(), MAX_EVIDENCE);

        let mut long = needle("long", r"(?s)BEGIN.+END", Category::Info);
        long.is_regex = true;
        let mut registry = PatternRegistry::from_patterns(vec![long]);

        let log = format!("BEGIN{}END", "x".repeat(500));
        let diagnosis = diagnose(&mut registry, &log).unwrap();
        let excerpt = &diagnosis.issues[0].evidence[0].excerpt;
        assert_eq!(excerpt.chars().count(), MAX_EXCERPT_CHARS);
    }

    #[test]
    fn issue_carries_pattern_explanation_verbatim() {
        let mut registry =
            PatternRegistry::from_patterns(vec![needle("explained", "zap", Category::Warning)]);

        let diagnosis = diagnose(&mut registry, "zap").unwrap();
        let issue = &diagnosis.issues[0];
        assert_eq!(issue.root_cause, "explained happened");
        assert_eq!(issue.suggested_fixes, vec!["fix explained".to_string()]);
        assert_eq!(issue.evidence[0].offset, 0);
    }
}
