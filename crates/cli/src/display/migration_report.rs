//! Markdown rendering for migration analyses.

use std::collections::BTreeMap;

use amplify_doctor_core::migration::{
    Compatibility, DetectedFeature, Generation, MigrationAnalysis,
};

/// Render the analysis as a markdown report
pub fn render(analysis: &MigrationAnalysis) -> String {
    let mut report = String::new();

    report.push_str("# Amplify Gen1 → Gen2 Migration Analysis\n\n");
    report.push_str(&format!(
        "**Project:** {}\n",
        analysis.project_path.display()
    ));
    report.push_str(&format!(
        "**Detected Generation:** {}\n\n",
        generation_label(analysis.generation)
    ));

    match analysis.generation {
        Generation::Gen2 => {
            report.push_str("✅ This project is already using Amplify Gen2!\n");
            return report;
        }
        Generation::Unknown => {
            report.push_str("⚠️ Could not detect an Amplify project in this directory.\n");
            return report;
        }
        Generation::Gen1 => {}
    }

    report.push_str("## Summary\n\n");
    report.push_str("| Metric | Count |\n");
    report.push_str("|--------|-------|\n");
    report.push_str(&format!(
        "| Total Features | {} |\n",
        analysis.summary.total_features
    ));
    report.push_str(&format!(
        "| ✅ Fully Supported | {} |\n",
        analysis.summary.fully_supported
    ));
    report.push_str(&format!(
        "| 🔧 Supported with CDK | {} |\n",
        analysis.summary.supported_with_cdk
    ));
    report.push_str(&format!(
        "| ❌ Not Supported | {} |\n",
        analysis.summary.not_supported
    ));
    report.push_str(&format!(
        "| ⚠️ Manual Migration | {} |\n",
        analysis.summary.manual_migration
    ));
    report.push('\n');

    if analysis.ready_for_migration {
        report.push_str("### ✅ Ready for Migration\n\n");
        report.push_str(
            "Your project can be migrated to Gen2. Some features may require CDK customization.\n\n",
        );
    } else {
        report.push_str("### ❌ Blocking Issues\n\n");
        report.push_str("The following issues must be resolved before migration:\n\n");
        for issue in &analysis.blocking_issues {
            report.push_str(&format!("- {}\n", issue));
        }
        report.push('\n');
    }

    if !analysis.warnings.is_empty() {
        report.push_str("### ⚠️ Warnings\n\n");
        for warning in &analysis.warnings {
            report.push_str(&format!("- {}\n", warning));
        }
        report.push('\n');
    }

    report.push_str("## Detected Categories\n\n");
    for category in &analysis.categories_detected {
        report.push_str(&format!("- {}\n", category));
    }
    report.push('\n');

    report.push_str("## Feature Analysis\n\n");

    let mut features_by_category: BTreeMap<&str, Vec<&DetectedFeature>> = BTreeMap::new();
    for feature in &analysis.features {
        features_by_category
            .entry(feature.category.as_str())
            .or_default()
            .push(feature);
    }

    for (category, features) in features_by_category {
        report.push_str(&format!("### {}\n\n", category.to_uppercase()));

        for feature in features {
            let status_icon = match &feature.compatibility {
                Compatibility::Supported => "✅",
                Compatibility::SupportedWithCdk { .. } => "🔧",
                Compatibility::NotSupported { .. } => "❌",
                Compatibility::ManualMigration { .. } => "⚠️",
            };

            report.push_str(&format!("#### {} {}\n\n", status_icon, feature.feature));

            if let Some(file) = &feature.file_path {
                if let Some(line) = feature.line_number {
                    report.push_str(&format!("**Location:** {}:{}\n\n", file.display(), line));
                } else {
                    report.push_str(&format!("**Location:** {}\n\n", file.display()));
                }
            }

            match &feature.compatibility {
                Compatibility::Supported => {
                    report.push_str("**Status:** Fully supported in Gen2\n\n");
                }
                Compatibility::SupportedWithCdk { customization } => {
                    report.push_str(&format!(
                        "**Status:** Supported with CDK customization\n\n**Customization:** {}\n\n",
                        customization
                    ));
                }
                Compatibility::NotSupported { alternative } => {
                    report.push_str(&format!(
                        "**Status:** Not supported\n\n**Alternative:** {}\n\n",
                        alternative
                    ));
                }
                Compatibility::ManualMigration { reason } => {
                    report.push_str(&format!(
                        "**Status:** Requires manual migration\n\n**Reason:** {}\n\n",
                        reason
                    ));
                }
            }

            report.push_str(&format!("**Migration Hint:** {}\n\n", feature.migration_hint));
            report.push_str("---\n\n");
        }
    }

    report.push_str("## Next Steps\n\n");
    report.push_str("1. Review the blocking issues above (if any)\n");
    report.push_str("2. For features requiring CDK, prepare your CDK customization strategy\n");
    report.push_str("3. Create a new Gen2 project: `npm create amplify@latest`\n");
    report.push_str("4. Migrate features one category at a time\n");
    report.push_str("5. Test thoroughly in sandbox environment before deploying\n\n");
    report.push_str("**Documentation:** https://docs.amplify.aws/react/start/migrate-to-gen2/\n");

    report
}

fn generation_label(generation: Generation) -> &'static str {
    match generation {
        Generation::Gen1 => "Gen1",
        Generation::Gen2 => "Gen2",
        Generation::Unknown => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn gen1_analysis() -> MigrationAnalysis {
        let mut analysis = MigrationAnalysis::new(Path::new("/tmp/app"));
        analysis.generation = Generation::Gen1;
        analysis.categories_detected.push("api".to_string());
        analysis.features.push(DetectedFeature {
            category: "api".to_string(),
            feature: "@searchable directive".to_string(),
            file_path: Some("/tmp/app/schema.graphql".into()),
            line_number: Some(3),
            compatibility: Compatibility::NotSupported {
                alternative: "Use Zero-ETL DynamoDB-to-OpenSearch integration".to_string(),
            },
            migration_hint: "Replace @searchable.".to_string(),
        });
        analysis.features.push(DetectedFeature {
            category: "geo".to_string(),
            feature: "Location Services (Geo)".to_string(),
            file_path: None,
            line_number: None,
            compatibility: Compatibility::SupportedWithCdk {
                customization: "AWS Location Service CDK constructs".to_string(),
            },
            migration_hint: "Geo requires CDK customization in Gen2.".to_string(),
        });
        analysis
            .blocking_issues
            .push("@searchable directive is not supported in Gen2".to_string());
        analysis.compute_summary();
        analysis
    }

    #[test]
    fn test_gen2_report_is_short() {
        let mut analysis = MigrationAnalysis::new(Path::new("/tmp/app"));
        analysis.generation = Generation::Gen2;

        let report = render(&analysis);
        assert!(report.contains("already using Amplify Gen2"));
        assert!(!report.contains("## Summary"));
    }

    #[test]
    fn test_gen1_report_lists_blockers_and_counts() {
        let report = render(&gen1_analysis());
        assert!(report.contains("### ❌ Blocking Issues"));
        assert!(report.contains("@searchable directive is not supported in Gen2"));
        assert!(report.contains("| ❌ Not Supported | 1 |"));
        assert!(report.contains("| 🔧 Supported with CDK | 1 |"));
        assert!(report.contains("**Location:** /tmp/app/schema.graphql:3"));
    }

    #[test]
    fn test_cdk_feature_names_its_customization() {
        let report = render(&gen1_analysis());
        assert!(report.contains("**Customization:** AWS Location Service CDK constructs"));
    }

    #[test]
    fn test_categories_render_in_stable_order() {
        let report = render(&gen1_analysis());
        let api = report.find("### API").unwrap();
        let geo = report.find("### GEO").unwrap();
        assert!(api < geo);
    }
}
