use anyhow::{bail, Result};
use serde::Serialize;
use tracing::debug;

use amplify_doctor_core::{ApplyOptions, ApplyOutcome, Error, Fix, FixApplier, FixCatalog};

use crate::cli::{FixesCommand, OutputFormat};
use crate::display::output;

/// Fixes registered for one pattern, as listed by `fixes list`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixList {
    pub pattern_id: String,
    pub fixes: Vec<Fix>,
}

/// What applying one fix did to the project tree
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub pattern_id: String,
    pub fix_id: String,
    #[serde(flatten)]
    pub outcome: ApplyOutcome,
}

pub fn fixes_command(command: FixesCommand, format: OutputFormat) -> Result<()> {
    match command {
        FixesCommand::List { pattern_id } => {
            let catalog = FixCatalog::builtin();
            let fixes = catalog.fixes_for(&pattern_id).to_vec();
            output(&FixList { pattern_id, fixes }, format)
        }

        FixesCommand::Apply {
            pattern_id,
            fix,
            root,
            yes,
            overwrite,
        } => {
            let catalog = FixCatalog::builtin();
            let entry = catalog
                .find(&pattern_id, &fix)
                .ok_or_else(|| Error::FixNotFound {
                    pattern_id: pattern_id.clone(),
                    fix_id: fix.clone(),
                })?;

            if entry.requires_confirmation && !yes {
                bail!(
                    "Fix '{}' modifies project files; re-run with --yes to confirm",
                    entry.id
                );
            }

            debug!(fix = %entry.id, root = %root.display(), "applying fix");
            let applier = FixApplier::new();
            let outcome = applier.apply(entry, &root, &ApplyOptions { overwrite })?;

            output(
                &ApplyReport {
                    pattern_id,
                    fix_id: fix,
                    outcome,
                },
                format,
            )
        }
    }
}
