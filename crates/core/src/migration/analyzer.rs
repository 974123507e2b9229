//! Project tree scan behind [`analyze_project`].

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::{Compatibility, DetectedFeature, Generation, MigrationAnalysis};
use crate::error::Result;

/// Scan a project directory for Amplify Gen1 features and rate each one
/// for Gen2 compatibility.
pub fn analyze_project(project_path: &Path) -> Result<MigrationAnalysis> {
    let mut analysis = MigrationAnalysis::new(project_path);
    let amplify_path = project_path.join("amplify");

    // Gen2 projects define their backend in TypeScript under amplify/
    if amplify_path.join("backend.ts").exists()
        || amplify_path.join("backend").join("backend.ts").exists()
    {
        analysis.generation = Generation::Gen2;
        return Ok(analysis);
    }

    if !amplify_path.exists() {
        analysis
            .warnings
            .push("No amplify/ folder found. This may not be an Amplify project.".to_string());
        return Ok(analysis);
    }

    analysis.generation = Generation::Gen1;
    debug!(path = %project_path.display(), "scanning Gen1 project");

    let backend = amplify_path.join("backend");

    let backend_config = backend.join("backend-config.json");
    if backend_config.exists() {
        scan_backend_config(&backend_config, &mut analysis)?;
    }

    let api_path = backend.join("api");
    if api_path.exists() {
        scan_graphql_api(&api_path, &mut analysis)?;
    }

    let auth_path = backend.join("auth");
    if auth_path.exists() {
        analysis.push_category("auth");
        scan_auth(&auth_path, &mut analysis)?;
    }

    let storage_path = backend.join("storage");
    if storage_path.exists() {
        analysis.push_category("storage");
        scan_storage(&storage_path, &mut analysis)?;
    }

    let function_path = backend.join("function");
    if function_path.exists() {
        analysis.push_category("function");
        scan_functions(&function_path, &mut analysis)?;
    }

    scan_deprecated_layout(&amplify_path, &mut analysis)?;

    analysis.compute_summary();
    Ok(analysis)
}

/// Every category key in backend-config.json counts as detected, even when
/// the matching directory is missing.
fn scan_backend_config(path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let config: serde_json::Value = serde_json::from_str(&content)?;

    if let Some(categories) = config.as_object() {
        for category in categories.keys() {
            analysis.push_category(category);
        }
    }

    Ok(())
}

fn scan_graphql_api(api_path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    analysis.push_category("api");

    for entry in WalkDir::new(api_path)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_name() == "schema.graphql" {
            scan_graphql_schema(entry.path(), analysis)?;
        }
    }

    Ok(())
}

fn scan_graphql_schema(schema_path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    let content = fs::read_to_string(schema_path)?;

    let feature = |name: &str, needle: &str, compatibility: Compatibility, hint: &str| {
        DetectedFeature {
            category: "api".to_string(),
            feature: name.to_string(),
            file_path: Some(schema_path.to_path_buf()),
            line_number: find_line_number(&content, needle),
            compatibility,
            migration_hint: hint.to_string(),
        }
    };

    if content.contains("@searchable") {
        analysis.features.push(feature(
            "@searchable directive",
            "@searchable",
            Compatibility::NotSupported {
                alternative: "Use Zero-ETL DynamoDB-to-OpenSearch integration".to_string(),
            },
            "Replace @searchable with Zero-ETL DynamoDB-to-OpenSearch. See: \
             https://docs.amplify.aws/react/build-a-backend/data/connect-to-existing-data-sources/",
        ));
        analysis
            .blocking_issues
            .push("@searchable directive is not supported in Gen2".to_string());
    }

    if content.contains("@predictions") {
        analysis.features.push(feature(
            "@predictions directive",
            "@predictions",
            Compatibility::NotSupported {
                alternative: "Use AI service integrations directly".to_string(),
            },
            "Gen2 offers AI service integrations instead of @predictions. See Bedrock and other \
             AI integrations.",
        ));
        analysis
            .blocking_issues
            .push("@predictions directive is not supported in Gen2".to_string());
    }

    if content.contains("@model") {
        analysis.features.push(feature(
            "@model directive",
            "@model",
            Compatibility::Supported,
            "Models are fully supported in Gen2. Use defineData() with a.model() in your schema.",
        ));
    }

    if content.contains("@manyToMany") {
        analysis.features.push(feature(
            "@manyToMany directive",
            "@manyToMany",
            Compatibility::ManualMigration {
                reason: "Implement with intermediate join table".to_string(),
            },
            "Gen2 doesn't have @manyToMany. Create an intermediate model to represent the \
             relationship.",
        ));
        analysis
            .warnings
            .push("@manyToMany requires manual migration with join table".to_string());
    }

    if content.contains("@versioned") || content.contains("_version") {
        analysis.features.push(feature(
            "DataStore / Conflict Resolution",
            "@versioned",
            Compatibility::NotSupported {
                alternative: "DataStore migration guide coming soon".to_string(),
            },
            "DataStore is not yet supported in Gen2. Continue using Gen1 if DataStore is critical.",
        ));
        analysis
            .blocking_issues
            .push("DataStore is not supported in Gen2".to_string());
    }

    if content.contains("@function") {
        analysis.features.push(feature(
            "@function resolver",
            "@function",
            Compatibility::Supported,
            "Function resolvers are supported in Gen2. Use a.handler.function() in your schema.",
        ));
    }

    if content.contains("@auth") {
        analysis.features.push(feature(
            "@auth directive",
            "@auth",
            Compatibility::Supported,
            "Auth rules are supported in Gen2. Use .authorization() on your models.",
        ));
    }

    if content.contains("@http") {
        analysis.features.push(feature(
            "@http directive",
            "@http",
            Compatibility::Supported,
            "HTTP data sources are supported via custom data sources in Gen2.",
        ));
    }

    Ok(())
}

fn scan_auth(auth_path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    for entry in subdirectories(auth_path) {
        let cli_inputs = entry.path().join("cli-inputs.json");
        if !cli_inputs.exists() {
            continue;
        }
        let content = fs::read_to_string(&cli_inputs)?;

        if content.contains("adminQueries") {
            analysis.features.push(DetectedFeature {
                category: "auth".to_string(),
                feature: "Admin Queries".to_string(),
                file_path: Some(cli_inputs.clone()),
                line_number: None,
                compatibility: Compatibility::SupportedWithCdk {
                    customization: "API Gateway and Lambda CDK constructs".to_string(),
                },
                migration_hint: "Admin queries require CDK customization in Gen2.".to_string(),
            });
        }

        if content.contains("\"mfaConfiguration\"") {
            analysis.features.push(DetectedFeature {
                category: "auth".to_string(),
                feature: "MFA Configuration".to_string(),
                file_path: Some(cli_inputs.clone()),
                line_number: None,
                compatibility: Compatibility::Supported,
                migration_hint: "MFA is fully supported in Gen2 with defineAuth().".to_string(),
            });
        }

        if content.contains("\"hostedUI\"") || content.contains("\"oAuth\"") {
            analysis.features.push(DetectedFeature {
                category: "auth".to_string(),
                feature: "OAuth/Social Login".to_string(),
                file_path: Some(cli_inputs.clone()),
                line_number: None,
                compatibility: Compatibility::Supported,
                migration_hint: "OAuth and social logins are supported. Gen2 has first-class \
                                 OIDC and SAML support."
                    .to_string(),
            });
        }

        if content.contains("\"triggers\"") {
            analysis.features.push(DetectedFeature {
                category: "auth".to_string(),
                feature: "Auth Triggers".to_string(),
                file_path: Some(cli_inputs.clone()),
                line_number: None,
                compatibility: Compatibility::Supported,
                migration_hint: "Auth triggers are supported in Gen2. Define them with triggers \
                                 property in defineAuth()."
                    .to_string(),
            });
        }
    }

    Ok(())
}

fn scan_storage(storage_path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    analysis.features.push(DetectedFeature {
        category: "storage".to_string(),
        feature: "S3 Storage".to_string(),
        file_path: Some(storage_path.to_path_buf()),
        line_number: None,
        compatibility: Compatibility::Supported,
        migration_hint: "S3 storage is fully supported in Gen2. Use defineStorage() to configure."
            .to_string(),
    });

    for entry in subdirectories(storage_path) {
        let cli_inputs = entry.path().join("cli-inputs.json");
        if !cli_inputs.exists() {
            continue;
        }
        let content = fs::read_to_string(&cli_inputs)?;
        if content.contains("\"triggerFunction\"") {
            analysis.features.push(DetectedFeature {
                category: "storage".to_string(),
                feature: "S3 Lambda Trigger".to_string(),
                file_path: Some(cli_inputs),
                line_number: None,
                compatibility: Compatibility::Supported,
                migration_hint: "S3 triggers are supported in Gen2. Use onUpload/onDelete in \
                                 defineStorage()."
                    .to_string(),
            });
        }
    }

    Ok(())
}

fn scan_functions(function_path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    for entry in subdirectories(function_path) {
        let function_name = entry.file_name().to_string_lossy().to_string();
        let function_params = entry.path().join("function-parameters.json");
        if !function_params.exists() {
            continue;
        }
        let content = fs::read_to_string(&function_params)?;

        if content.contains("\"lambdaLayers\"") || content.contains("\"layers\"") {
            analysis.features.push(DetectedFeature {
                category: "function".to_string(),
                feature: format!("Lambda Layers ({function_name})"),
                file_path: Some(function_params.clone()),
                line_number: None,
                compatibility: Compatibility::NotSupported {
                    alternative: "Bundle dependencies directly or use CDK".to_string(),
                },
                migration_hint: "Lambda layers are not supported in Gen2. Bundle dependencies \
                                 in your function or use CDK."
                    .to_string(),
            });
            analysis.warnings.push(format!(
                "Lambda layers in function '{function_name}' need alternative approach"
            ));
        }

        if content.contains("\"python\"") {
            analysis.features.push(DetectedFeature {
                category: "function".to_string(),
                feature: format!("Python Runtime ({function_name})"),
                file_path: Some(function_params.clone()),
                line_number: None,
                compatibility: Compatibility::SupportedWithCdk {
                    customization: "CDK function definition with a Python runtime".to_string(),
                },
                migration_hint: "Python functions require CDK customization in Gen2. TypeScript \
                                 is the first-class runtime."
                    .to_string(),
            });
        } else if content.contains("\"go\"")
            || content.contains("\"java\"")
            || content.contains("\"dotnet\"")
        {
            analysis.features.push(DetectedFeature {
                category: "function".to_string(),
                feature: format!("Non-Node Runtime ({function_name})"),
                file_path: Some(function_params.clone()),
                line_number: None,
                compatibility: Compatibility::SupportedWithCdk {
                    customization: "CDK function definition with a custom runtime".to_string(),
                },
                migration_hint: "Go/Java/.NET functions require CDK customization in Gen2."
                    .to_string(),
            });
        } else {
            analysis.features.push(DetectedFeature {
                category: "function".to_string(),
                feature: format!("Node.js Function ({function_name})"),
                file_path: Some(entry.path().to_path_buf()),
                line_number: None,
                compatibility: Compatibility::Supported,
                migration_hint: "Node.js/TypeScript functions are fully supported in Gen2. Use \
                                 defineFunction()."
                    .to_string(),
            });
        }
    }

    Ok(())
}

/// Gen1-only categories and layouts that have no direct Gen2 counterpart.
fn scan_deprecated_layout(amplify_path: &Path, analysis: &mut MigrationAnalysis) -> Result<()> {
    let backend = amplify_path.join("backend");

    let transform_conf = backend.join("api").join("transform.conf.json");
    if transform_conf.exists() {
        let content = fs::read_to_string(&transform_conf)?;
        if content.contains("\"transformers\"") {
            analysis.features.push(DetectedFeature {
                category: "api".to_string(),
                feature: "Custom GraphQL Transformers".to_string(),
                file_path: Some(transform_conf),
                line_number: None,
                compatibility: Compatibility::NotSupported {
                    alternative: "Use custom business logic in handlers".to_string(),
                },
                migration_hint: "Custom GraphQL transformers are not supported in Gen2. \
                                 Implement custom logic in function handlers."
                    .to_string(),
            });
            analysis
                .blocking_issues
                .push("Custom GraphQL transformers not supported".to_string());
        }
    }

    let geo_path = backend.join("geo");
    if geo_path.exists() {
        analysis.push_category("geo");
        analysis.features.push(DetectedFeature {
            category: "geo".to_string(),
            feature: "Location Services (Geo)".to_string(),
            file_path: Some(geo_path),
            line_number: None,
            compatibility: Compatibility::SupportedWithCdk {
                customization: "AWS Location Service CDK constructs".to_string(),
            },
            migration_hint: "Geo requires CDK customization in Gen2. Use AWS Location Service \
                             CDK constructs."
                .to_string(),
        });
    }

    let analytics_path = backend.join("analytics");
    if analytics_path.exists() {
        analysis.push_category("analytics");
        analysis.features.push(DetectedFeature {
            category: "analytics".to_string(),
            feature: "Analytics (Pinpoint)".to_string(),
            file_path: Some(analytics_path),
            line_number: None,
            compatibility: Compatibility::SupportedWithCdk {
                customization: "Pinpoint CDK constructs".to_string(),
            },
            migration_hint: "Analytics requires CDK customization in Gen2. Use Pinpoint CDK \
                             constructs."
                .to_string(),
        });
    }

    let interactions_path = backend.join("interactions");
    if interactions_path.exists() {
        analysis.push_category("interactions");
        analysis.features.push(DetectedFeature {
            category: "interactions".to_string(),
            feature: "Interactions (Lex Bots)".to_string(),
            file_path: Some(interactions_path),
            line_number: None,
            compatibility: Compatibility::SupportedWithCdk {
                customization: "Lex CDK constructs".to_string(),
            },
            migration_hint: "Interactions requires CDK customization in Gen2. Use Lex CDK \
                             constructs."
                .to_string(),
        });
    }

    let api_path = backend.join("api");
    if api_path.exists() {
        for entry in subdirectories(&api_path) {
            let cli_inputs = entry.path().join("cli-inputs.json");
            if !cli_inputs.exists() {
                continue;
            }
            let content = fs::read_to_string(&cli_inputs)?;
            if content.contains("\"REST\"") {
                analysis.features.push(DetectedFeature {
                    category: "api".to_string(),
                    feature: "REST API".to_string(),
                    file_path: Some(cli_inputs),
                    line_number: None,
                    compatibility: Compatibility::SupportedWithCdk {
                        customization: "API Gateway CDK constructs".to_string(),
                    },
                    migration_hint: "REST APIs require CDK customization in Gen2. Use API \
                                     Gateway CDK constructs."
                        .to_string(),
                });
            }
        }
    }

    Ok(())
}

fn subdirectories(path: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|idx| idx + 1)
}
