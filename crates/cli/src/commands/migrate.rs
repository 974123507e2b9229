use std::path::{Path, PathBuf};

use anyhow::Result;

use amplify_doctor_core::analyze_project;

use crate::cli::OutputFormat;
use crate::display::output;

pub fn migrate_command(path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let project_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let analysis = analyze_project(&project_path)?;
    output(&analysis, format)
}
