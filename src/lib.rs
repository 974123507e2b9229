//! Shared log fixtures for the integration tests.
//!
//! The snippets mirror real Amplify console output closely enough to
//! exercise the built-in patterns without shipping full build transcripts.

/// `npm ci` refusing to run against an out-of-sync package-lock.json
pub const NPM_CI_LOG: &str = "\
Installing dependencies...
npm ERR! `npm ci` can only install packages with an existing package-lock.json
npm ERR! code EUSAGE
Build failed";

/// Node.js V8 heap exhaustion during the build step
pub const HEAP_EXHAUSTED_LOG: &str = "\
Building application...
FATAL ERROR: JavaScript heap out of memory
Build terminated";

/// Engine check rejecting the provisioned Node.js version
pub const NODE_ENGINE_LOG: &str = "\
Checking Node version...
error The engine \"node\" is incompatible with this module.
Expected version \">=18.0.0\".";

/// One TypeScript compile error with file and position
pub const TYPESCRIPT_LOG: &str = "\
Compiling TypeScript...
src/App.tsx(15,10): error TS2339: Property 'foo' does not exist on type 'Bar'.
Build failed with 1 error";

/// Webpack failing to resolve a workspace import
pub const MODULE_NOT_FOUND_LOG: &str = "\
Building...
Module not found: Error: Can't resolve '@acme/shared' in '/app/src'
webpack compilation failed";

/// Next.js prerender crash during `next build`
pub const NEXTJS_LOG: &str = "\
> next build
Error occurred prerendering page \"/dashboard\".
Error: Cannot read properties of undefined";

/// Vite build aborted by a Rollup resolution error
pub const VITE_LOG: &str = "\
> vite build
error during build:
RollupError: Could not resolve \"./missing-module\"";

/// Build cancelled by the job time limit
pub const TIMEOUT_LOG: &str = "\
Running build...
Build timed out after 30 minutes";

/// Write into a read-only directory of the build container
pub const PERMISSION_LOG: &str = "\
Writing output...
EACCES: permission denied, mkdir '/opt/build'";

/// Registry unreachable from the build container
pub const NETWORK_LOG: &str = "\
Fetching packages...
npm ERR! network request to https://registry.npmjs.org failed
npm ERR! ENOTFOUND registry.npmjs.org";

/// pnpm refusing an incompatible lock file
pub const PNPM_LOCKFILE_LOG: &str = "\
Installing with pnpm...
ERR_PNPM_LOCKFILE_BREAKING_CHANGE  Lockfile is not compatible";

/// Mixed lock files: npm warns while a pnpm lock file is present
pub const LOCK_FILE_MISMATCH_LOG: &str = "\
npm WARN old lockfile
npm WARN old lockfile The package-lock.json file was created with an old version of npm,
Found pnpm-lock.yaml alongside package-lock.json";

/// Three distinct failures in one transcript, in log order:
/// npm ci, then TypeScript, then the heap
pub const MULTI_FAILURE_LOG: &str = "\
Starting build...
npm ERR! `npm ci` can only install packages
error TS2339: Property 'x' does not exist
FATAL ERROR: JavaScript heap out of memory";

/// A build that succeeded end to end; no built-in pattern should fire
pub const CLEAN_BUILD_LOG: &str = "\
Installing dependencies...
npm install completed successfully
Building application...
Build completed successfully
Deploying...
Deployment completed successfully";
