use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use amplify_doctor_core::Category;

use crate::commands::{
    diagnose_command, fixes_command, init_command, migrate_command, patterns_command,
};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "amplify-doctor")]
#[command(version, about = "Diagnose AWS Amplify build failures from their logs", long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Output format
    #[arg(long, short, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Pattern store file (defaults to ~/.amplify-doctor-patterns.json)
    #[arg(long, global = true, value_name = "FILE")]
    pub patterns_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// Compact text output for humans
    Text,
}

impl OutputFormat {
    /// Parse a format name as written in the config file
    pub fn from_config(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

/// Severity category for a user-defined pattern
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum PatternCategory {
    Error,
    Warning,
    Info,
}

impl From<PatternCategory> for Category {
    fn from(value: PatternCategory) -> Self {
        match value {
            PatternCategory::Error => Category::Error,
            PatternCategory::Warning => Category::Warning,
            PatternCategory::Info => Category::Info,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose a build log for known failure patterns
    Diagnose {
        /// Path to the log file, or - to read from stdin
        log: String,

        /// Include the decoded log text in the output
        #[arg(long)]
        include_logs: bool,
    },

    /// Inspect and manage failure patterns
    Patterns {
        #[command(subcommand)]
        command: PatternsCommand,
    },

    /// List and apply quick fixes for diagnosed patterns
    Fixes {
        #[command(subcommand)]
        command: FixesCommand,
    },

    /// Analyze a project for Gen1 to Gen2 migration readiness
    Migrate {
        /// Path to the project directory (defaults to current directory)
        #[arg(long, short)]
        path: Option<PathBuf>,
    },

    /// Initialize a config file with sample settings
    Init {
        /// Overwrite an existing config file
        #[arg(short = 'F', long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum PatternsCommand {
    /// List patterns (enabled only unless --all)
    List {
        /// Include disabled patterns
        #[arg(long)]
        all: bool,
    },

    /// Add a user-defined pattern
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Match expression (literal substring unless --regex)
        #[arg(long)]
        pattern: String,

        /// Treat the expression as a regular expression
        #[arg(long)]
        regex: bool,

        /// Match case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Severity of a hit
        #[arg(long, value_enum, default_value = "warning")]
        category: PatternCategory,

        /// What a hit means
        #[arg(long)]
        root_cause: String,

        /// Suggested fix text (repeat for multiple fixes)
        #[arg(long = "fix", value_name = "TEXT")]
        fixes: Vec<String>,
    },

    /// Remove a pattern by id
    Remove {
        /// Pattern id
        id: String,
    },

    /// Flip a pattern between enabled and disabled
    Toggle {
        /// Pattern id
        id: String,
    },

    /// Copy a pattern under a new id, counters reset
    Duplicate {
        /// Pattern id to copy
        id: String,
    },

    /// Try an ad-hoc expression against a log without saving it
    Test {
        /// Path to the log file, or - to read from stdin
        log: String,

        /// Match expression
        #[arg(long)]
        pattern: String,

        /// Treat the expression as a regular expression
        #[arg(long)]
        regex: bool,

        /// Match case-sensitively
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Import patterns from a JSON file
    Import {
        /// File holding a JSON array of patterns
        file: PathBuf,
    },

    /// Export every stored pattern to a JSON file
    Export {
        /// Destination file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum FixesCommand {
    /// List the fixes registered for a pattern
    List {
        /// Pattern id
        pattern_id: String,
    },

    /// Apply one fix to a project tree
    Apply {
        /// Pattern id the fix belongs to
        pattern_id: String,

        /// Fix id (see fixes list)
        #[arg(long)]
        fix: String,

        /// Project root the fix paths resolve against
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Confirm fixes that modify project files
        #[arg(short = 'y', long)]
        yes: bool,

        /// Let file-creating fixes overwrite existing files
        #[arg(long)]
        overwrite: bool,
    },
}

impl Cli {
    /// Execute the parsed command
    pub fn execute(self) -> Result<()> {
        let config = Config::load().unwrap_or_default();

        // CLI flag wins over the config file, which wins over the default
        let format = self
            .format
            .or_else(|| {
                config
                    .default_format
                    .as_deref()
                    .and_then(OutputFormat::from_config)
            })
            .unwrap_or(OutputFormat::Json);

        let patterns_file = self
            .patterns_file
            .or_else(|| config.patterns_file.clone())
            .unwrap_or_else(Config::default_patterns_path);

        match self.command {
            Commands::Diagnose { log, include_logs } => {
                diagnose_command(&log, include_logs, &patterns_file, format)
            }
            Commands::Patterns { command } => patterns_command(command, &patterns_file, format),
            Commands::Fixes { command } => fixes_command(command, format),
            Commands::Migrate { path } => migrate_command(path.as_deref(), format),
            Commands::Init { force } => init_command(force),
        }
    }
}
