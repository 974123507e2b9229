//! Configuration file support
//!
//! Loads user settings from ~/.amplify-doctor.toml

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// User configuration loaded from the config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (json, json-pretty, text)
    pub default_format: Option<String>,

    /// Pattern store location, overriding ~/.amplify-doctor-patterns.json
    pub patterns_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path (~/.amplify-doctor.toml)
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".amplify-doctor.toml")
    }

    /// Where patterns live when neither the CLI nor the config names a file
    pub fn default_patterns_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".amplify-doctor-patterns.json")
    }

    /// Create a sample config file
    pub fn create_sample(force: bool) -> Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() && !force {
            anyhow::bail!(
                "Config file already exists at {} (use --force to overwrite)",
                path.display()
            );
        }

        let sample = r#"# amplify-doctor configuration
# Place this file at ~/.amplify-doctor.toml

# Default output format: json, json-pretty, or text
# default_format = "json-pretty"

# Where user patterns are stored
# patterns_file = "/home/me/.amplify-doctor-patterns.json"
"#;
        std::fs::write(&path, sample)?;
        Ok(path)
    }
}
