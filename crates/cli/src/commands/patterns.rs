use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use amplify_doctor_core::matcher;
use amplify_doctor_core::{Category, Pattern, PatternMatch};

use crate::cli::{OutputFormat, PatternsCommand};
use crate::commands::diagnose::read_log_source;
use crate::commands::open_registry;
use crate::display::output;

/// Pattern rows as listed by `patterns list`
#[derive(Serialize)]
#[serde(transparent)]
pub struct PatternList(pub Vec<Pattern>);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAdded {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRemoved {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternToggled {
    pub id: String,
    pub enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDuplicated {
    pub id: String,
    pub source_id: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternsImported {
    pub imported: usize,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternsExported {
    pub exported: usize,
    pub path: PathBuf,
}

/// Result of running one ad-hoc expression over a log
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub source: String,
    pub expression: String,
    pub is_regex: bool,
    pub case_sensitive: bool,
    pub match_count: usize,
    pub matches: Vec<PatternMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn patterns_command(
    command: PatternsCommand,
    patterns_file: &Path,
    format: OutputFormat,
) -> Result<()> {
    match command {
        PatternsCommand::List { all } => {
            let registry = open_registry(patterns_file)?;
            let patterns = if all {
                registry.patterns().to_vec()
            } else {
                registry.list_enabled().into_iter().cloned().collect()
            };
            output(&PatternList(patterns), format)
        }

        PatternsCommand::Add {
            name,
            pattern,
            regex,
            case_sensitive,
            category,
            root_cause,
            fixes,
        } => {
            let mut registry = open_registry(patterns_file)?;
            let id = registry.add(Pattern {
                id: String::new(),
                name: name.clone(),
                pattern,
                is_regex: regex,
                case_sensitive,
                category: category.into(),
                root_cause,
                suggested_fixes: fixes,
                enabled: true,
                match_count: None,
                last_matched: None,
            })?;
            output(&PatternAdded { id, name }, format)
        }

        PatternsCommand::Remove { id } => {
            let mut registry = open_registry(patterns_file)?;
            let removed = registry.remove(&id)?;
            output(
                &PatternRemoved {
                    id: removed.id,
                    name: removed.name,
                },
                format,
            )
        }

        PatternsCommand::Toggle { id } => {
            let mut registry = open_registry(patterns_file)?;
            let enabled = registry.toggle_enabled(&id)?;
            output(&PatternToggled { id, enabled }, format)
        }

        PatternsCommand::Duplicate { id } => {
            let mut registry = open_registry(patterns_file)?;
            let new_id = registry.duplicate(&id)?;
            let name = registry
                .get(&new_id)
                .map(|p| p.name.clone())
                .unwrap_or_default();
            output(
                &PatternDuplicated {
                    id: new_id,
                    source_id: id,
                    name,
                },
                format,
            )
        }

        PatternsCommand::Test {
            log,
            pattern,
            regex,
            case_sensitive,
        } => {
            let (source, content) = read_log_source(&log)?;
            let probe = Pattern {
                id: "adhoc".to_string(),
                name: "ad-hoc expression".to_string(),
                pattern: pattern.clone(),
                is_regex: regex,
                case_sensitive,
                category: Category::Info,
                root_cause: String::new(),
                suggested_fixes: Vec::new(),
                enabled: true,
                match_count: None,
                last_matched: None,
            };
            let result = matcher::run(&probe, &content.raw_content);
            let report = TestReport {
                source,
                expression: pattern,
                is_regex: regex,
                case_sensitive,
                match_count: result.matches.len(),
                matches: result.matches,
                error: result.error,
            };
            output(&report, format)
        }

        PatternsCommand::Import { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let incoming: Vec<Pattern> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid pattern file: {}", file.display()))?;
            let mut registry = open_registry(patterns_file)?;
            let ids = registry.import(incoming)?;
            output(
                &PatternsImported {
                    imported: ids.len(),
                    total: registry.patterns().len(),
                },
                format,
            )
        }

        PatternsCommand::Export { file } => {
            let registry = open_registry(patterns_file)?;
            let patterns = registry.export();
            let json = serde_json::to_string_pretty(&patterns)?;
            fs::write(&file, json)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            output(
                &PatternsExported {
                    exported: patterns.len(),
                    path: file,
                },
                format,
            )
        }
    }
}
