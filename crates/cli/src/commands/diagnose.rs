use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use amplify_doctor_core::diagnose;
use amplify_doctor_core::logs::{decode_log_bytes, read_log_file, LogContent};
use amplify_doctor_core::Diagnosis;

use crate::cli::OutputFormat;
use crate::commands::open_registry;
use crate::display::output;

/// Diagnosis of one log source, as emitted by `diagnose`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseReport {
    pub source: String,
    #[serde(flatten)]
    pub diagnosis: Diagnosis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_logs: Option<String>,
}

pub fn diagnose_command(
    log: &str,
    include_logs: bool,
    patterns_file: &Path,
    format: OutputFormat,
) -> Result<()> {
    let (source, content) = read_log_source(log)?;
    debug!(source = %source, bytes = content.raw_content.len(), "diagnosing log");

    let mut registry = open_registry(patterns_file)?;
    let diagnosis = diagnose(&mut registry, &content.raw_content)?;

    let report = DiagnoseReport {
        source,
        diagnosis,
        raw_logs: include_logs.then(|| content.raw_content.clone()),
    };
    output(&report, format)
}

/// Read a log from a file path, or from stdin when the argument is `-`
pub(crate) fn read_log_source(log: &str) -> Result<(String, LogContent)> {
    if log == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read log from stdin")?;
        let text = decode_log_bytes(&bytes)?;
        let content = LogContent::from_sections([("BUILD", text.as_str())]);
        Ok(("stdin".to_string(), content))
    } else {
        let path = Path::new(log);
        let content =
            read_log_file(path).with_context(|| format!("Failed to read log file: {log}"))?;
        Ok((log.to_string(), content))
    }
}
