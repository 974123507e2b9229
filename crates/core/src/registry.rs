//! The failure-pattern registry.
//!
//! Holds the working set of patterns (built-in presets plus user-defined
//! ones), validates every mutation, and writes the whole collection back to
//! its store after each change so counters and edits survive restarts.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::matcher;
use crate::presets;
use crate::store::PatternStore;
use crate::types::{Pattern, PatternId};

pub struct PatternRegistry {
    patterns: Vec<Pattern>,
    store: Option<Box<dyn PatternStore>>,
}

impl PatternRegistry {
    /// Registry seeded with the built-in patterns, no persistence
    pub fn new() -> Self {
        Self {
            patterns: presets::builtin_patterns(),
            store: None,
        }
    }

    /// Registry over an existing collection, no persistence
    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        Self {
            patterns,
            store: None,
        }
    }

    /// Open a registry backed by `store`.
    ///
    /// A store that has never been written gets seeded with the built-ins.
    /// A store holding a collection (even an empty one) is used as-is, so
    /// deliberately deleting every pattern sticks across restarts.
    pub fn with_store(mut store: Box<dyn PatternStore>) -> Result<Self> {
        match store.load()? {
            Some(patterns) => Ok(Self {
                patterns,
                store: Some(store),
            }),
            None => {
                let patterns = presets::builtin_patterns();
                store.save(&patterns)?;
                info!(count = patterns.len(), "seeded pattern store with built-ins");
                Ok(Self {
                    patterns,
                    store: Some(store),
                })
            }
        }
    }

    /// Full collection in storage order
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// Enabled patterns in scan order: built-ins in canonical order first,
    /// then custom patterns in insertion order
    pub fn list_enabled(&self) -> Vec<&Pattern> {
        let mut enabled: Vec<(usize, usize, &Pattern)> = self
            .patterns
            .iter()
            .enumerate()
            .filter(|(_, p)| p.enabled)
            .map(|(pos, p)| (presets::canonical_index(&p.id).unwrap_or(usize::MAX), pos, p))
            .collect();
        enabled.sort_by_key(|(canon, pos, _)| (*canon, *pos));
        enabled.into_iter().map(|(_, _, p)| p).collect()
    }

    /// Add a pattern after validation. An empty id gets a fresh UUID.
    pub fn add(&mut self, mut pattern: Pattern) -> Result<PatternId> {
        validate(&pattern)?;
        if pattern.id.is_empty() {
            pattern.id = Uuid::new_v4().to_string();
        } else if self.get(&pattern.id).is_some() {
            return Err(Error::ValidationError(format!(
                "pattern id '{}' already exists",
                pattern.id
            )));
        }
        let id = pattern.id.clone();
        self.patterns.push(pattern);
        self.persist()?;
        debug!(%id, "pattern added");
        Ok(id)
    }

    /// Replace the body of an existing pattern, keeping its id.
    /// Counters carry over unless `reset_counters` is set.
    pub fn update(&mut self, id: &str, mut updated: Pattern, reset_counters: bool) -> Result<()> {
        validate(&updated)?;
        let Some(existing) = self.patterns.iter_mut().find(|p| p.id == id) else {
            return Err(Error::PatternNotFound(id.to_string()));
        };
        updated.id = existing.id.clone();
        if reset_counters {
            updated.match_count = None;
            updated.last_matched = None;
        } else {
            updated.match_count = existing.match_count;
            updated.last_matched = existing.last_matched;
        }
        *existing = updated;
        self.persist()
    }

    /// Remove a pattern (built-in or custom) and return it
    pub fn remove(&mut self, id: &str) -> Result<Pattern> {
        let Some(pos) = self.patterns.iter().position(|p| p.id == id) else {
            return Err(Error::PatternNotFound(id.to_string()));
        };
        let removed = self.patterns.remove(pos);
        self.persist()?;
        debug!(id = %removed.id, "pattern removed");
        Ok(removed)
    }

    /// Flip the enabled flag, returning the new state
    pub fn toggle_enabled(&mut self, id: &str) -> Result<bool> {
        let Some(pattern) = self.patterns.iter_mut().find(|p| p.id == id) else {
            return Err(Error::PatternNotFound(id.to_string()));
        };
        pattern.enabled = !pattern.enabled;
        let state = pattern.enabled;
        self.persist()?;
        Ok(state)
    }

    /// Clone a pattern under a new id, with "(Copy)" in the name and
    /// counters reset
    pub fn duplicate(&mut self, id: &str) -> Result<PatternId> {
        let Some(original) = self.get(id) else {
            return Err(Error::PatternNotFound(id.to_string()));
        };
        let mut copy = original.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.name = format!("{} (Copy)", copy.name);
        copy.match_count = None;
        copy.last_matched = None;
        let new_id = copy.id.clone();
        self.patterns.push(copy);
        self.persist()?;
        Ok(new_id)
    }

    /// Restore a removed built-in under its canonical id
    pub fn add_preset(&mut self, preset_id: &str) -> Result<PatternId> {
        let Some(preset) = presets::find(preset_id) else {
            return Err(Error::PatternNotFound(preset_id.to_string()));
        };
        let already_present =
            self.get(&preset.id).is_some() || self.patterns.iter().any(|p| p.name == preset.name);
        if already_present {
            return Err(Error::DuplicatePreset(preset.name));
        }
        let id = preset.id.clone();
        self.patterns.push(preset);
        self.persist()?;
        Ok(id)
    }

    /// Record one diagnosis round worth of matches and persist the counters
    pub fn record_matches(&mut self, matched_ids: &[PatternId]) -> Result<()> {
        if matched_ids.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        for id in matched_ids {
            if let Some(pattern) = self.patterns.iter_mut().find(|p| p.id == *id) {
                pattern.record_match(now);
            }
        }
        self.persist()
    }

    /// Bring in an exported collection. Every record is validated up front
    /// and lands under a fresh id; nothing mutates when any record fails.
    pub fn import(&mut self, incoming: Vec<Pattern>) -> Result<Vec<PatternId>> {
        for pattern in &incoming {
            validate(pattern).map_err(|e| {
                Error::ValidationError(format!("import of '{}' rejected: {e}", pattern.name))
            })?;
        }
        let mut ids = Vec::with_capacity(incoming.len());
        for mut pattern in incoming {
            pattern.id = Uuid::new_v4().to_string();
            ids.push(pattern.id.clone());
            self.patterns.push(pattern);
        }
        self.persist()?;
        info!(count = ids.len(), "patterns imported");
        Ok(ids)
    }

    /// Snapshot of the collection for export
    pub fn export(&self) -> Vec<Pattern> {
        self.patterns.clone()
    }

    fn persist(&mut self) -> Result<()> {
        if let Some(store) = self.store.as_mut() {
            store.save(&self.patterns)?;
        }
        Ok(())
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject patterns that would be unusable at scan time
fn validate(pattern: &Pattern) -> Result<()> {
    if pattern.name.trim().is_empty() {
        return Err(Error::ValidationError(
            "pattern name must not be empty".to_string(),
        ));
    }
    if pattern.pattern.is_empty() {
        return Err(Error::ValidationError(
            "match expression must not be empty".to_string(),
        ));
    }
    if pattern.root_cause.trim().is_empty() {
        return Err(Error::ValidationError(
            "root cause must not be empty".to_string(),
        ));
    }
    if pattern.is_regex {
        matcher::compile_expression(&pattern.pattern, pattern.case_sensitive).map_err(|e| {
            Error::InvalidExpression {
                name: pattern.name.clone(),
                message: e.to_string(),
            }
        })?;
    }
    Ok(())
}
