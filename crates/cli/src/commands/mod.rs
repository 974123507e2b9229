pub mod diagnose;
pub mod fixes;
pub mod init;
pub mod migrate;
pub mod patterns;

pub use diagnose::diagnose_command;
pub use fixes::fixes_command;
pub use init::init_command;
pub use migrate::migrate_command;
pub use patterns::patterns_command;

use std::path::Path;

use anyhow::Result;

use amplify_doctor_core::{JsonFileStore, PatternRegistry};

/// Open the pattern registry backed by the given store file
pub(crate) fn open_registry(patterns_file: &Path) -> Result<PatternRegistry> {
    let registry = PatternRegistry::with_store(Box::new(JsonFileStore::new(patterns_file)))?;
    Ok(registry)
}
