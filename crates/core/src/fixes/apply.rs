//! Applying quick fixes to a project tree.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::util;

use super::{ContentTransform, Fix, FixAction};

/// Options for a single apply call
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Let file-create replace an existing file
    pub overwrite: bool,
}

/// What actually happened when a fix was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum ApplyOutcome {
    Created {
        path: PathBuf,
    },
    Modified {
        path: PathBuf,
    },
    /// The file already had the desired shape, nothing was written
    NoChangeNeeded {
        path: PathBuf,
    },
    Deleted {
        path: PathBuf,
    },
    /// Delete target was already gone; success, not an error
    AlreadyAbsent {
        path: PathBuf,
    },
    /// Command handed back to the caller, never spawned here
    CommandSuggested {
        command: String,
    },
    /// URL handed back to the caller
    NavigationSuggested {
        url: String,
    },
}

/// Applies fixes with per-target serialization.
///
/// All writes to one target file funnel through one lock, so concurrent
/// applies cannot interleave their read-transform-write cycles. The file
/// replacement itself goes through a temp file plus rename, so readers
/// never observe a half-written target.
pub struct FixApplier {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FixApplier {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Apply one fix against the project rooted at `root`
    pub fn apply(&self, fix: &Fix, root: &Path, options: &ApplyOptions) -> Result<ApplyOutcome> {
        debug!(fix_id = %fix.id, pattern_id = %fix.pattern_id, "applying fix");
        match &fix.action {
            FixAction::FileCreate { path, contents } => {
                self.with_target_lock(root, path, |target| {
                    create_file(target, contents, options)
                })
            }
            FixAction::FileModify { path, transform } => {
                self.with_target_lock(root, path, |target| modify_file(target, transform))
            }
            FixAction::FileDelete { path } => {
                self.with_target_lock(root, path, delete_file)
            }
            FixAction::TerminalCommand { command } => Ok(ApplyOutcome::CommandSuggested {
                command: command.clone(),
            }),
            FixAction::ExternalNavigation { url } => Ok(ApplyOutcome::NavigationSuggested {
                url: url.clone(),
            }),
        }
    }

    fn with_target_lock<F>(&self, root: &Path, relative: &str, op: F) -> Result<ApplyOutcome>
    where
        F: FnOnce(&Path) -> Result<ApplyOutcome>,
    {
        let target = root.join(relative);
        let lock = self.target_lock(&target);
        let _guard = lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        op(&target)
    }

    fn target_lock(&self, target: &Path) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(target.to_path_buf()).or_default().clone()
    }
}

impl Default for FixApplier {
    fn default() -> Self {
        Self::new()
    }
}

fn create_file(target: &Path, contents: &str, options: &ApplyOptions) -> Result<ApplyOutcome> {
    if target.exists() && !options.overwrite {
        return Err(Error::FixTargetExists(target.to_path_buf()));
    }
    util::write_atomic(target, contents).map_err(|e| fix_io(target, e))?;
    info!(path = %target.display(), "fix created file");
    Ok(ApplyOutcome::Created {
        path: target.to_path_buf(),
    })
}

fn modify_file(target: &Path, transform: &ContentTransform) -> Result<ApplyOutcome> {
    if !target.exists() {
        return Err(Error::FixTargetMissing(target.to_path_buf()));
    }
    let current = fs::read_to_string(target).map_err(|e| fix_io(target, e))?;
    let desired = transform.apply(&current);
    if desired == current {
        return Ok(ApplyOutcome::NoChangeNeeded {
            path: target.to_path_buf(),
        });
    }
    util::write_atomic(target, &desired).map_err(|e| fix_io(target, e))?;
    info!(path = %target.display(), "fix modified file");
    Ok(ApplyOutcome::Modified {
        path: target.to_path_buf(),
    })
}

fn delete_file(target: &Path) -> Result<ApplyOutcome> {
    if !target.exists() {
        return Ok(ApplyOutcome::AlreadyAbsent {
            path: target.to_path_buf(),
        });
    }
    fs::remove_file(target).map_err(|e| fix_io(target, e))?;
    info!(path = %target.display(), "fix deleted file");
    Ok(ApplyOutcome::Deleted {
        path: target.to_path_buf(),
    })
}

fn fix_io(path: &Path, source: io::Error) -> Error {
    Error::FixIo {
        path: path.to_path_buf(),
        source,
    }
}
