//! Persistence for the pattern collection.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Pattern;
use crate::util;

/// Durable backing for the registry's pattern collection.
///
/// The whole collection travels as one value in both directions. `load`
/// returns `None` when nothing has been persisted yet, so callers can tell
/// "never written" apart from "deliberately emptied" and seed the built-ins
/// exactly once.
pub trait PatternStore: Send {
    fn load(&self) -> Result<Option<Vec<Pattern>>>;
    fn save(&mut self, patterns: &[Pattern]) -> Result<()>;
}

/// Pattern collection stored as a pretty-printed JSON array in one file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatternStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Pattern>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let patterns = serde_json::from_str(&raw)
            .map_err(|e| Error::StoreError(format!("{}: {e}", self.path.display())))?;
        Ok(Some(patterns))
    }

    fn save(&mut self, patterns: &[Pattern]) -> Result<()> {
        let json = serde_json::to_string_pretty(patterns)?;
        util::write_atomic(&self.path, &json).map_err(|e| {
            Error::StoreError(format!("{}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), count = patterns.len(), "pattern store saved");
        Ok(())
    }
}

/// In-memory store for tests and hosts that persist elsewhere
#[derive(Debug, Default)]
pub struct MemoryStore {
    patterns: Option<Vec<Pattern>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns(patterns: Vec<Pattern>) -> Self {
        Self {
            patterns: Some(patterns),
        }
    }
}

impl PatternStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Pattern>>> {
        Ok(self.patterns.clone())
    }

    fn save(&mut self, patterns: &[Pattern]) -> Result<()> {
        self.patterns = Some(patterns.to_vec());
        Ok(())
    }
}
