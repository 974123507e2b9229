//! amplify-doctor - failure diagnosis for AWS Amplify build logs
//!
//! This crate provides functionality to:
//! - Keep a registry of failure patterns (built-in presets plus user-defined ones)
//! - Scan build logs with every enabled pattern and aggregate ranked diagnoses
//! - Map diagnosed patterns to quick fixes and apply them to a project tree
//! - Analyze Gen1 Amplify projects for Gen2 migration readiness
pub mod diagnose;
pub mod error;
pub mod fixes;
pub mod logs;
pub mod matcher;
pub mod migration;
pub mod presets;
pub mod registry;
pub mod store;
pub mod types;

mod util;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use diagnose::diagnose;
pub use fixes::{ApplyOptions, ApplyOutcome, ContentTransform, Fix, FixAction, FixApplier, FixCatalog};
pub use migration::{analyze_project, MigrationAnalysis};
pub use registry::PatternRegistry;
pub use store::{JsonFileStore, MemoryStore, PatternStore};
