//! Registry of quick fixes, keyed by pattern id.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

use super::{ContentTransform, Fix, FixAction};

const AMPLIFY_ENV_VARS_DOCS: &str =
    "https://docs.aws.amazon.com/amplify/latest/userguide/environment-variables.html";
const AMPLIFY_BUILD_SETTINGS_DOCS: &str =
    "https://docs.aws.amazon.com/amplify/latest/userguide/build-settings.html";

const STARTER_BUILDSPEC: &str = "\
version: 1
frontend:
  phases:
    preBuild:
      commands:
        - npm ci
    build:
      commands:
        - npm run build
  artifacts:
    baseDirectory: dist
    files:
      - '**/*'
  cache:
    paths:
      - node_modules/**/*
";

/// Quick fixes grouped by the pattern they remedy.
///
/// Keys form an open taxonomy: any identifier made of alphanumerics,
/// underscores and hyphens is accepted, so both built-in SCREAMING_SNAKE
/// ids and generated UUIDs qualify. Within one key, fixes keep their
/// registration order, most relevant first.
pub struct FixCatalog {
    fixes: HashMap<String, Vec<Fix>>,
}

impl FixCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self {
            fixes: HashMap::new(),
        }
    }

    /// Catalog pre-populated with fixes for the built-in patterns
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for fix in builtin_fixes() {
            catalog
                .fixes
                .entry(fix.pattern_id.clone())
                .or_default()
                .push(fix);
        }
        catalog
    }

    /// Register fixes under a pattern key.
    ///
    /// The key, every fix and the batch as a whole are validated before
    /// anything is inserted; on error the catalog is unchanged.
    pub fn register(&mut self, pattern_id: &str, fixes: Vec<Fix>) -> Result<()> {
        validate_key(pattern_id)?;
        let existing = self.fixes.get(pattern_id);
        for (index, fix) in fixes.iter().enumerate() {
            validate_fix(fix)?;
            if fix.pattern_id != pattern_id {
                return Err(Error::ValidationError(format!(
                    "fix '{}' belongs to '{}', not '{}'",
                    fix.id, fix.pattern_id, pattern_id
                )));
            }
            let clashes = existing.is_some_and(|slot| slot.iter().any(|f| f.id == fix.id))
                || fixes[..index].iter().any(|f| f.id == fix.id);
            if clashes {
                return Err(Error::ValidationError(format!(
                    "duplicate fix id '{}' under '{}'",
                    fix.id, pattern_id
                )));
            }
        }
        self.fixes
            .entry(pattern_id.to_string())
            .or_default()
            .extend(fixes);
        Ok(())
    }

    /// Fixes for a pattern in registration order, empty when none are defined
    pub fn fixes_for(&self, pattern_id: &str) -> &[Fix] {
        self.fixes
            .get(pattern_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find(&self, pattern_id: &str, fix_id: &str) -> Option<&Fix> {
        self.fixes_for(pattern_id).iter().find(|f| f.id == fix_id)
    }

    /// Pattern ids that have at least one fix, sorted
    pub fn pattern_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.fixes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for FixCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_key(key: &str) -> Result<()> {
    let well_formed = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidFixKey(key.to_string()))
    }
}

fn validate_fix(fix: &Fix) -> Result<()> {
    if fix.id.trim().is_empty() || fix.title.trim().is_empty() {
        return Err(Error::ValidationError(format!(
            "fix '{}' needs a non-empty id and title",
            fix.id
        )));
    }
    match &fix.action {
        FixAction::FileCreate { path, .. }
        | FixAction::FileModify { path, .. }
        | FixAction::FileDelete { path } => validate_target_path(&fix.id, path)?,
        FixAction::TerminalCommand { command } => {
            if command.trim().is_empty() {
                return Err(Error::ValidationError(format!(
                    "fix '{}' has an empty command",
                    fix.id
                )));
            }
        }
        FixAction::ExternalNavigation { url } => {
            if url.trim().is_empty() {
                return Err(Error::ValidationError(format!(
                    "fix '{}' has an empty url",
                    fix.id
                )));
            }
        }
    }
    if let FixAction::FileModify { transform, .. } = &fix.action {
        validate_transform(&fix.id, transform)?;
    }
    Ok(())
}

fn validate_target_path(fix_id: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::ValidationError(format!(
            "fix '{fix_id}' has an empty target path"
        )));
    }
    if Path::new(path).is_absolute() {
        return Err(Error::ValidationError(format!(
            "fix '{fix_id}' target must be relative to the project root"
        )));
    }
    Ok(())
}

fn validate_transform(fix_id: &str, transform: &ContentTransform) -> Result<()> {
    match transform {
        ContentTransform::ReplaceAll { from, to } => {
            if from.is_empty() || to.contains(from.as_str()) {
                return Err(Error::ValidationError(format!(
                    "fix '{fix_id}': replacement text reintroduces its own search text"
                )));
            }
        }
        ContentTransform::EnsureLine { line } => {
            if line.contains('\n') {
                return Err(Error::ValidationError(format!(
                    "fix '{fix_id}': EnsureLine takes a single line"
                )));
            }
        }
        ContentTransform::RemoveLines { needle } => {
            if needle.is_empty() {
                return Err(Error::ValidationError(format!(
                    "fix '{fix_id}': RemoveLines needs a needle"
                )));
            }
        }
        ContentTransform::SetContent { .. } => {}
    }
    Ok(())
}

fn fix(
    pattern_id: &str,
    id: &str,
    title: &str,
    description: &str,
    action: FixAction,
    requires_confirmation: bool,
) -> Fix {
    Fix {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        pattern_id: pattern_id.to_string(),
        action,
        requires_confirmation,
    }
}

fn builtin_fixes() -> Vec<Fix> {
    vec![
        fix(
            "LOCK_FILE_MISMATCH",
            "switch-buildspec-to-pnpm",
            "Switch amplify.yml to pnpm",
            "Replaces 'npm ci' with a frozen pnpm install so the build uses the lock file that is actually committed.",
            FixAction::FileModify {
                path: "amplify.yml".to_string(),
                transform: ContentTransform::ReplaceAll {
                    from: "npm ci".to_string(),
                    to: "pnpm install --frozen-lockfile".to_string(),
                },
            },
            true,
        ),
        fix(
            "LOCK_FILE_MISMATCH",
            "remove-stray-npm-lockfile",
            "Delete the conflicting package-lock.json",
            "Removes package-lock.json so only one package manager's lock file remains.",
            FixAction::FileDelete {
                path: "package-lock.json".to_string(),
            },
            true,
        ),
        fix(
            "NODE_VERSION_MISMATCH",
            "add-nvmrc",
            "Pin Node.js 18 with .nvmrc",
            "Creates an .nvmrc at the repository root so Amplify and local shells agree on the Node.js version.",
            FixAction::FileCreate {
                path: ".nvmrc".to_string(),
                contents: "18\n".to_string(),
            },
            false,
        ),
        fix(
            "NODE_VERSION_MISMATCH",
            "install-pinned-node",
            "Install the pinned Node.js locally",
            "Installs and activates the Node.js version the project expects.",
            FixAction::TerminalCommand {
                command: "nvm install 18 && nvm use 18".to_string(),
            },
            false,
        ),
        fix(
            "OUT_OF_MEMORY",
            "raise-heap-in-build-script",
            "Raise the Node.js heap limit for the build",
            "Prefixes the package.json build script with NODE_OPTIONS so the compiler gets a 4 GiB heap.",
            FixAction::FileModify {
                path: "package.json".to_string(),
                transform: ContentTransform::ReplaceAll {
                    from: "\"build\": \"next build\"".to_string(),
                    to: "\"build\": \"NODE_OPTIONS=--max_old_space_size=4096 next build\""
                        .to_string(),
                },
            },
            true,
        ),
        fix(
            "OUT_OF_MEMORY",
            "set-node-options-env",
            "Set NODE_OPTIONS in the Amplify console",
            "Opens the environment variable guide; add NODE_OPTIONS=--max_old_space_size=4096 to the branch.",
            FixAction::ExternalNavigation {
                url: AMPLIFY_ENV_VARS_DOCS.to_string(),
            },
            false,
        ),
        fix(
            "NPM_CI_FAILURE",
            "regenerate-lockfile",
            "Regenerate package-lock.json",
            "Rebuilds the lock file from package.json; commit the result.",
            FixAction::TerminalCommand {
                command: "npm install --package-lock-only".to_string(),
            },
            false,
        ),
        fix(
            "NPM_CI_FAILURE",
            "unignore-lockfile",
            "Stop ignoring package-lock.json",
            "Drops package-lock.json entries from .gitignore so the lock file reaches the build.",
            FixAction::FileModify {
                path: ".gitignore".to_string(),
                transform: ContentTransform::RemoveLines {
                    needle: "package-lock.json".to_string(),
                },
            },
            true,
        ),
        fix(
            "MISSING_ENV_VARS",
            "open-env-var-guide",
            "Configure environment variables in the Amplify console",
            "Opens the guide for adding branch environment variables.",
            FixAction::ExternalNavigation {
                url: AMPLIFY_ENV_VARS_DOCS.to_string(),
            },
            false,
        ),
        fix(
            "AMPLIFY_YML_ERROR",
            "create-starter-buildspec",
            "Create a starter amplify.yml",
            "Writes a minimal working buildspec with preBuild, build and artifacts phases.",
            FixAction::FileCreate {
                path: "amplify.yml".to_string(),
                contents: STARTER_BUILDSPEC.to_string(),
            },
            false,
        ),
        fix(
            "AMPLIFY_YML_ERROR",
            "open-buildspec-reference",
            "Open the buildspec reference",
            "Opens the amplify.yml build settings documentation.",
            FixAction::ExternalNavigation {
                url: AMPLIFY_BUILD_SETTINGS_DOCS.to_string(),
            },
            false,
        ),
        fix(
            "BUILD_TIMEOUT",
            "open-timeout-settings",
            "Raise the build timeout in the Amplify console",
            "Opens the build settings documentation; the timeout lives under the app's build configuration.",
            FixAction::ExternalNavigation {
                url: AMPLIFY_BUILD_SETTINGS_DOCS.to_string(),
            },
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_entries_pass_registration_validation() {
        let mut fresh = FixCatalog::new();
        let mut by_pattern: HashMap<String, Vec<Fix>> = HashMap::new();
        for fix in builtin_fixes() {
            by_pattern.entry(fix.pattern_id.clone()).or_default().push(fix);
        }
        for (pattern_id, fixes) in by_pattern {
            fresh.register(&pattern_id, fixes).unwrap();
        }
    }

    #[test]
    fn lock_file_mismatch_offers_switch_before_delete() {
        let catalog = FixCatalog::builtin();
        let fixes = catalog.fixes_for("LOCK_FILE_MISMATCH");

        assert_eq!(fixes[0].id, "switch-buildspec-to-pnpm");
        assert_eq!(fixes[1].id, "remove-stray-npm-lockfile");
    }

    #[test]
    fn unknown_pattern_has_no_fixes() {
        let catalog = FixCatalog::builtin();
        assert!(catalog.fixes_for("SOMETHING_ELSE").is_empty());
    }

    #[test]
    fn find_locates_by_pattern_and_fix_id() {
        let catalog = FixCatalog::builtin();
        let found = catalog.find("NODE_VERSION_MISMATCH", "add-nvmrc").unwrap();
        assert!(matches!(found.action, FixAction::FileCreate { .. }));
        assert!(catalog.find("NODE_VERSION_MISMATCH", "nope").is_none());
    }

    #[test]
    fn register_accepts_uuid_style_keys() {
        let mut catalog = FixCatalog::new();
        let key = "7c0e1a52-9f64-4c08-bf4e-0d3ff2f3a7a1";
        let entry = fix(
            key,
            "custom-fix",
            "Do something",
            "",
            FixAction::TerminalCommand {
                command: "echo hi".to_string(),
            },
            false,
        );
        catalog.register(key, vec![entry]).unwrap();
        assert_eq!(catalog.fixes_for(key).len(), 1);
    }

    #[test]
    fn register_rejects_malformed_keys() {
        let mut catalog = FixCatalog::new();
        for bad in ["", "has space", "sla/sh"] {
            assert!(matches!(
                catalog.register(bad, vec![]),
                Err(Error::InvalidFixKey(_))
            ));
        }
    }

    #[test]
    fn register_rejects_self_reintroducing_replacement() {
        let mut catalog = FixCatalog::new();
        let bad = fix(
            "KEY",
            "grows-forever",
            "Would grow on every apply",
            "",
            FixAction::FileModify {
                path: "package.json".to_string(),
                transform: ContentTransform::ReplaceAll {
                    from: "npm run build".to_string(),
                    to: "NODE_OPTIONS=--max_old_space_size=4096 npm run build".to_string(),
                },
            },
            false,
        );
        assert!(catalog.register("KEY", vec![bad]).is_err());
    }

    #[test]
    fn register_rejects_absolute_paths_and_duplicate_ids() {
        let mut catalog = FixCatalog::new();
        let absolute = fix(
            "KEY",
            "escapes-root",
            "Writes outside the project",
            "",
            FixAction::FileDelete {
                path: "/etc/hosts".to_string(),
            },
            true,
        );
        assert!(catalog.register("KEY", vec![absolute]).is_err());

        let command = |id: &str| {
            fix(
                "KEY",
                id,
                "same id twice",
                "",
                FixAction::TerminalCommand {
                    command: "true".to_string(),
                },
                false,
            )
        };
        assert!(catalog
            .register("KEY", vec![command("twin"), command("twin")])
            .is_err());
        // failed batch left nothing behind
        assert!(catalog.fixes_for("KEY").is_empty());
    }
}
