pub mod formatter;
pub mod migration_report;

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render one result value in the requested output format
pub fn output<T: Serialize + TextOutput>(data: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(data)?);
        }
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            println!("{}", data.to_text());
        }
    }
    Ok(())
}

/// Human-readable rendering for the text output format
pub trait TextOutput {
    fn to_text(&self) -> String;
}
