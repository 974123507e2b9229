pub mod issue;
pub mod matching;
pub mod pattern;

// Re-export commonly used types
pub use issue::{Diagnosis, Evidence, Issue, PatternError};
pub use matching::{MatchResult, PatternMatch};
pub use pattern::{Category, Pattern, PatternId};
