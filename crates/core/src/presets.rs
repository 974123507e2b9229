//! Built-in failure patterns.
//!
//! These cover the common ways an Amplify build goes wrong, from package
//! manager trouble to framework-specific build errors. Their identifiers are
//! stable SCREAMING_SNAKE keys; the fix catalog is keyed by the same ids.

use crate::types::{Category, Pattern};

/// Identifiers of the built-in patterns, in canonical listing order
pub const PRESET_IDS: [&str; 20] = [
    "LOCK_FILE_MISMATCH",
    "PACKAGE_MANAGER_CONFLICT",
    "NODE_VERSION_MISMATCH",
    "MISSING_ENV_VARS",
    "NPM_CI_FAILURE",
    "PNPM_INSTALL_FAILURE",
    "YARN_INSTALL_FAILURE",
    "AMPLIFY_YML_ERROR",
    "OUT_OF_MEMORY",
    "BUILD_TIMEOUT",
    "ARTIFACT_PATH_ERROR",
    "TYPESCRIPT_ERROR",
    "ESLINT_ERROR",
    "MODULE_NOT_FOUND",
    "PERMISSION_DENIED",
    "NETWORK_ERROR",
    "DOCKER_ERROR",
    "PYTHON_ERROR",
    "NEXTJS_ERROR",
    "VITE_ERROR",
];

/// Position of a built-in in the canonical order, `None` for custom ids
pub(crate) fn canonical_index(id: &str) -> Option<usize> {
    PRESET_IDS.iter().position(|preset| *preset == id)
}

/// Look up a single built-in pattern by id
pub fn find(id: &str) -> Option<Pattern> {
    builtin_patterns().into_iter().find(|p| p.id == id)
}

fn preset(
    id: &str,
    name: &str,
    expr: &str,
    case_sensitive: bool,
    category: Category,
    root_cause: &str,
    fixes: &[&str],
) -> Pattern {
    Pattern {
        id: id.to_string(),
        name: name.to_string(),
        pattern: expr.to_string(),
        is_regex: true,
        case_sensitive,
        category,
        root_cause: root_cause.to_string(),
        suggested_fixes: fixes.iter().map(|f| f.to_string()).collect(),
        enabled: true,
        match_count: None,
        last_matched: None,
    }
}

/// All built-in patterns in canonical order
pub fn builtin_patterns() -> Vec<Pattern> {
    vec![
        preset(
            "LOCK_FILE_MISMATCH",
            "Lock file mismatch",
            r"(?s)npm WARN.*?(?:pnpm-lock\.yaml|yarn\.lock)|(?:pnpm-lock\.yaml|yarn\.lock).*?npm WARN",
            true,
            Category::Warning,
            "Multiple lock files detected or package manager mismatch",
            &[
                "Remove conflicting lock files (keep only one)",
                "Update amplify.yml to use the correct package manager",
                "Run 'npm ci' with package-lock.json OR 'pnpm install --frozen-lockfile' with pnpm-lock.yaml",
            ],
        ),
        preset(
            "PACKAGE_MANAGER_CONFLICT",
            "Package manager conflict",
            r"(?s)npm (?:ci|install).*?(?:pnpm|yarn) install|(?:pnpm|yarn) install.*?npm (?:ci|install)|pnpm install.*?yarn install|yarn install.*?pnpm install",
            true,
            Category::Warning,
            "Multiple package managers detected in build",
            &[
                "Use only one package manager consistently",
                "Update amplify.yml preBuild and build commands",
                "Ensure CI environment matches local development",
            ],
        ),
        preset(
            "NODE_VERSION_MISMATCH",
            "Node.js version mismatch",
            r#"The engine "node" is incompatible|expected node version|unsupported engine|nvm use"#,
            false,
            Category::Error,
            "Node.js version in Amplify doesn't match project requirements",
            &[
                "Add 'nvm use' to preBuild commands in amplify.yml",
                "Set Node.js version in Amplify console build settings",
                "Add .nvmrc file to repository root",
                "Update package.json engines field",
            ],
        ),
        preset(
            "MISSING_ENV_VARS",
            "Missing environment variables",
            r"(?s)(?:REACT_APP_|NEXT_PUBLIC_|VITE_)\w*.{0,200}?(?:undefined|not set|missing|required)|environment variable.{0,200}?(?:undefined|not set|missing|required)|process\.env.{0,200}?(?:undefined|not set|missing|required)",
            false,
            Category::Warning,
            "Required environment variables are not configured",
            &[
                "Add missing environment variables in Amplify console",
                "Check for typos in variable names",
                "Ensure variables are set for the correct branch/environment",
            ],
        ),
        preset(
            "NPM_CI_FAILURE",
            "npm ci failure",
            r"npm ERR! (?:cipm can only install|`npm ci` can only install|code EUSAGE|The `npm ci` command)",
            true,
            Category::Error,
            "npm ci failed - likely due to package-lock.json sync issues",
            &[
                "Run 'npm install' locally to regenerate package-lock.json",
                "Commit the updated package-lock.json",
                "Ensure package-lock.json is not in .gitignore",
            ],
        ),
        preset(
            "PNPM_INSTALL_FAILURE",
            "pnpm install failure",
            r"ERR_PNPM_\w+|pnpm: command not found",
            true,
            Category::Error,
            "pnpm installation failed",
            &[
                "Install pnpm in preBuild: 'npm install -g pnpm'",
                "Run 'pnpm install' locally to update lock file",
                "Check pnpm version compatibility",
            ],
        ),
        preset(
            "YARN_INSTALL_FAILURE",
            "Yarn install failure",
            r"(?s)error An unexpected error occurred|YN000[12]|yarn install.{0,300}?(?:error|failed)",
            true,
            Category::Error,
            "Yarn installation failed",
            &[
                "Run 'yarn install' locally and commit yarn.lock",
                "Ensure yarn is installed in preBuild: 'npm install -g yarn'",
                "Check yarn version compatibility",
            ],
        ),
        preset(
            "AMPLIFY_YML_ERROR",
            "amplify.yml configuration error",
            r"(?s)YAMLException|Invalid buildspec|(?:amplify\.yml|buildspec|build specification).{0,300}?(?:invalid|failed to parse|syntax error)",
            false,
            Category::Error,
            "amplify.yml buildspec has configuration errors",
            &[
                "Validate YAML syntax in amplify.yml",
                "Check indentation (use spaces, not tabs)",
                "Verify all required phases are defined (preBuild, build, artifacts)",
                "Reference: https://docs.aws.amazon.com/amplify/latest/userguide/build-settings.html",
            ],
        ),
        preset(
            "OUT_OF_MEMORY",
            "Out of memory",
            r"FATAL ERROR: CALL_AND_RETRY_LAST Allocation failed|FATAL ERROR: Ineffective mark-compacts|JavaScript heap out of memory|ENOMEM|OOMKilled|out of memory",
            false,
            Category::Error,
            "Build process ran out of memory",
            &[
                "Add NODE_OPTIONS=--max_old_space_size=4096 to environment variables",
                "Optimize build by reducing bundle size",
                "Consider using a larger Amplify build instance",
            ],
        ),
        preset(
            "BUILD_TIMEOUT",
            "Build timeout",
            r"timed out|build timeout|exceeded time limit|ETIMEDOUT",
            false,
            Category::Error,
            "Build exceeded time limit",
            &[
                "Increase build timeout in Amplify console",
                "Optimize build steps to run faster",
                "Check for hanging processes or infinite loops",
                "Consider caching node_modules",
            ],
        ),
        preset(
            "ARTIFACT_PATH_ERROR",
            "Artifact path error",
            r"(?s)artifacts baseDirectory|(?:ENOENT|[Nn]o such file or directory).{0,200}?(?:dist|build|\.next|out|artifacts)",
            true,
            Category::Error,
            "Build artifacts directory not found or misconfigured",
            &[
                "Verify baseDirectory in amplify.yml matches actual build output",
                "Common paths: 'dist', 'build', '.next', 'out'",
                "Ensure build command actually generates output",
            ],
        ),
        preset(
            "TYPESCRIPT_ERROR",
            "TypeScript error",
            r"error TS(\d+):\s*(.+)|Type error:|tsc exited with code|\bTS\d{4}\b",
            true,
            Category::Error,
            "TypeScript compilation failed",
            &[
                "Fix TypeScript errors locally before pushing",
                "Run 'npx tsc --noEmit' to check for errors",
                "Ensure all type definitions are installed (@types/*)",
                "Check tsconfig.json for correct configuration",
            ],
        ),
        preset(
            "ESLINT_ERROR",
            "ESLint error",
            r"(?s)eslint.{0,300}?(?:error|problems|parsing error)|parsing error:.{0,300}?eslint",
            false,
            Category::Warning,
            "ESLint validation failed",
            &[
                "Run 'npm run lint' or 'npx eslint .' locally",
                "Fix linting errors or adjust rules in .eslintrc",
                "Consider adding 'CI=false' to skip lint warnings as errors",
            ],
        ),
        preset(
            "MODULE_NOT_FOUND",
            "Module not found",
            r"Module not found|Cannot find module|Module build failed|ModuleNotFoundError|Error: Cannot resolve",
            true,
            Category::Error,
            "Required module/package not found",
            &[
                "Ensure all dependencies are listed in package.json",
                "Check import paths for typos or case sensitivity",
                "Verify the module is not in devDependencies when needed in production",
                "Run 'npm install' to ensure all packages are installed",
            ],
        ),
        preset(
            "PERMISSION_DENIED",
            "Permission denied",
            r"EACCES|EPERM|permission denied|operation not permitted",
            false,
            Category::Error,
            "File system permission error",
            &[
                "Avoid writing to read-only directories",
                "Use /tmp for temporary files in Amplify builds",
                "Check file permissions in repository",
            ],
        ),
        preset(
            "NETWORK_ERROR",
            "Network error",
            r"ENOTFOUND|ECONNREFUSED|ECONNRESET|EAI_AGAIN|getaddrinfo|network request failed|socket hang up",
            true,
            Category::Warning,
            "Network connectivity issue during build",
            &[
                "Retry the build - may be a transient network issue",
                "Check if npm registry or external services are accessible",
                "Consider using a private npm registry or cache",
            ],
        ),
        preset(
            "DOCKER_ERROR",
            "Docker error",
            r"(?s)docker(?:file)?.{0,300}?(?:error|failed|not found|denied)",
            false,
            Category::Info,
            "Docker/container build issue",
            &[
                "Verify Dockerfile syntax and base image availability",
                "Check Docker build context and .dockerignore",
                "Ensure Docker commands are supported in Amplify build environment",
            ],
        ),
        preset(
            "PYTHON_ERROR",
            "Python error",
            r"(?s)ModuleNotFoundError: No module named|ImportError:|pip install.{0,200}?(?:error|failed)",
            true,
            Category::Info,
            "Python dependency or syntax error",
            &[
                "Add Python packages to requirements.txt",
                "Install Python dependencies in preBuild phase",
                "Verify Python version compatibility",
            ],
        ),
        preset(
            "NEXTJS_ERROR",
            "Next.js build error",
            r"(?s)Error occurred prerendering|next build.{0,300}?(?:error|failed)|(?:getStaticProps|getServerSideProps).{0,200}?[Ee]rror",
            true,
            Category::Error,
            "Next.js build or configuration error",
            &[
                "Run 'npm run build' locally to reproduce the error",
                "Check getStaticProps/getServerSideProps for runtime errors",
                "Verify NEXT_PUBLIC_* environment variables are set",
                "Set baseDirectory to '.next' in amplify.yml artifacts",
            ],
        ),
        preset(
            "VITE_ERROR",
            "Vite build error",
            r"(?s)vite build.{0,300}?(?:error|failed)|error during build|RollupError",
            true,
            Category::Error,
            "Vite build or bundling error",
            &[
                "Run 'npm run build' locally to reproduce",
                "Verify VITE_* environment variables are set in Amplify",
                "Set baseDirectory to 'dist' in amplify.yml artifacts",
                "Check vite.config.ts for build configuration issues",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher;

    #[test]
    fn ids_match_canonical_order() {
        let ids: Vec<String> = builtin_patterns().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, PRESET_IDS.to_vec());
    }

    #[test]
    fn every_preset_expression_compiles() {
        for pattern in builtin_patterns() {
            assert!(
                matcher::compile_expression(&pattern.pattern, pattern.case_sensitive).is_ok(),
                "preset {} does not compile",
                pattern.id
            );
        }
    }

    #[test]
    fn every_preset_has_root_cause_and_fixes() {
        for pattern in builtin_patterns() {
            assert!(!pattern.root_cause.is_empty(), "{} has no root cause", pattern.id);
            assert!(!pattern.suggested_fixes.is_empty(), "{} has no fixes", pattern.id);
            assert!(pattern.enabled);
        }
    }

    #[test]
    fn npm_ci_preset_detects_lockfile_sync_error() {
        let log = "npm ERR! `npm ci` can only install packages with an existing package-lock.json";
        let preset = find("NPM_CI_FAILURE").unwrap();
        assert!(matcher::run(&preset, log).is_match());
    }

    #[test]
    fn heap_exhaustion_matches_out_of_memory() {
        let log = "FATAL ERROR: JavaScript heap out of memory";
        let preset = find("OUT_OF_MEMORY").unwrap();
        assert!(matcher::run(&preset, log).is_match());
    }

    #[test]
    fn clean_log_matches_no_preset() {
        let log = "Starting build...\n\
                   Installing dependencies\n\
                   Compiled successfully.\n\
                   Deployment complete";
        for pattern in builtin_patterns() {
            let result = matcher::run(&pattern, log);
            assert!(
                !result.is_match(),
                "preset {} fired on a clean log: {:?}",
                pattern.id,
                result.matches
            );
        }
    }

    #[test]
    fn find_returns_none_for_custom_ids() {
        assert!(find("not-a-preset").is_none());
        assert!(find("LOCK_FILE_MISMATCH").is_some());
    }
}
