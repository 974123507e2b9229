//! Gen1 to Gen2 migration readiness analysis for Amplify projects.

mod analyzer;

pub use analyzer::analyze_project;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which Amplify generation a project is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    Gen1,
    Gen2,
    Unknown,
}

/// Gen2 compatibility of a detected Gen1 feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Compatibility {
    /// Fully supported in Gen2.
    Supported,
    /// Supported once the named CDK customization is in place.
    SupportedWithCdk { customization: String },
    /// Not supported; an alternative approach is named.
    NotSupported { alternative: String },
    /// Must be migrated by hand for the stated reason.
    ManualMigration { reason: String },
}

/// A Gen1 feature found in the project tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFeature {
    pub category: String,
    pub feature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    pub compatibility: Compatibility,
    pub migration_hint: String,
}

/// Feature counts by compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSummary {
    pub total_features: usize,
    pub fully_supported: usize,
    pub supported_with_cdk: usize,
    pub not_supported: usize,
    pub manual_migration: usize,
}

/// Full result of a migration readiness scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationAnalysis {
    pub generation: Generation,
    pub project_path: PathBuf,
    pub categories_detected: Vec<String>,
    pub features: Vec<DetectedFeature>,
    pub ready_for_migration: bool,
    pub blocking_issues: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: MigrationSummary,
}

impl MigrationAnalysis {
    pub fn new(project_path: &Path) -> Self {
        Self {
            generation: Generation::Unknown,
            project_path: project_path.to_path_buf(),
            categories_detected: Vec::new(),
            features: Vec::new(),
            ready_for_migration: true,
            blocking_issues: Vec::new(),
            warnings: Vec::new(),
            summary: MigrationSummary::default(),
        }
    }

    /// Tally features by compatibility and derive overall readiness.
    pub fn compute_summary(&mut self) {
        let mut summary = MigrationSummary {
            total_features: self.features.len(),
            ..MigrationSummary::default()
        };

        for feature in &self.features {
            match feature.compatibility {
                Compatibility::Supported => summary.fully_supported += 1,
                Compatibility::SupportedWithCdk { .. } => summary.supported_with_cdk += 1,
                Compatibility::NotSupported { .. } => summary.not_supported += 1,
                Compatibility::ManualMigration { .. } => summary.manual_migration += 1,
            }
        }

        self.ready_for_migration = self.blocking_issues.is_empty() && summary.not_supported == 0;
        self.summary = summary;
    }

    fn push_category(&mut self, category: &str) {
        if !self.categories_detected.iter().any(|c| c == category) {
            self.categories_detected.push(category.to_string());
        }
    }
}
