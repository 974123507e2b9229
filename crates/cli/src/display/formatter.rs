//! Text renderings for every report the commands emit.

use amplify_doctor_core::{ApplyOutcome, ContentTransform, FixAction, MigrationAnalysis};

use crate::commands::diagnose::DiagnoseReport;
use crate::commands::fixes::{ApplyReport, FixList};
use crate::commands::patterns::{
    PatternAdded, PatternDuplicated, PatternList, PatternRemoved, PatternToggled,
    PatternsExported, PatternsImported, TestReport,
};
use crate::display::migration_report;
use crate::display::TextOutput;

impl TextOutput for DiagnoseReport {
    fn to_text(&self) -> String {
        let mut out = String::from("DIAGNOSIS REPORT\n");
        out.push_str(&"═".repeat(60));
        out.push('\n');
        out.push_str(&format!("Source: {}\n", self.source));
        out.push('\n');

        if self.diagnosis.issues.is_empty() {
            out.push_str("No known failure patterns detected.\n");
        } else {
            out.push_str(&format!("ISSUES FOUND: {}\n", self.diagnosis.issues.len()));
            out.push_str(&"─".repeat(60));
            out.push('\n');

            for (i, issue) in self.diagnosis.issues.iter().enumerate() {
                out.push_str(&format!(
                    "\n{}. [{}] {}\n",
                    i + 1,
                    issue.category.label().to_uppercase(),
                    issue.pattern_name
                ));
                out.push_str(&format!("   Cause: {}\n", issue.root_cause));
                if let Some(evidence) = issue.evidence.first() {
                    out.push_str(&format!(
                        "   Evidence (offset {}): {}\n",
                        evidence.offset,
                        evidence.excerpt.trim_end()
                    ));
                }
                if !issue.suggested_fixes.is_empty() {
                    out.push_str("   Fixes:\n");
                    for fix in &issue.suggested_fixes {
                        out.push_str(&format!("   → {}\n", fix));
                    }
                }
            }
        }

        if !self.diagnosis.pattern_errors.is_empty() {
            out.push('\n');
            out.push_str(&"─".repeat(60));
            out.push('\n');
            for error in &self.diagnosis.pattern_errors {
                out.push_str(&format!(
                    "⚠ Pattern '{}' could not run: {}\n",
                    error.pattern_name, error.message
                ));
            }
        }

        if let Some(logs) = &self.raw_logs {
            out.push('\n');
            out.push_str(&"─".repeat(60));
            out.push_str("\nRAW LOGS:\n");
            out.push_str(&"─".repeat(60));
            out.push('\n');
            out.push_str(logs);
        }
        out
    }
}

impl TextOutput for PatternList {
    fn to_text(&self) -> String {
        if self.0.is_empty() {
            return "No patterns found.".to_string();
        }
        let mut out = String::from("PATTERNS\n");
        out.push_str(&"─".repeat(60));
        out.push('\n');
        for pattern in &self.0 {
            let marker = if pattern.enabled { "✓" } else { "✗" };
            let kind = if pattern.is_regex { "regex" } else { "literal" };
            out.push_str(&format!(
                "{} {} - {} [{}]\n",
                marker,
                pattern.id,
                pattern.name,
                pattern.category.label()
            ));
            out.push_str(&format!("  Expression ({}): {}\n", kind, pattern.pattern));
            if let Some(count) = pattern.match_count {
                out.push_str(&format!("  Matched {} time(s)", count));
                if let Some(at) = pattern.last_matched {
                    out.push_str(&format!(", last at {}", at.to_rfc3339()));
                }
                out.push('\n');
            }
        }
        out
    }
}

impl TextOutput for PatternAdded {
    fn to_text(&self) -> String {
        format!("✓ Added pattern '{}' ({})\n", self.name, self.id)
    }
}

impl TextOutput for PatternRemoved {
    fn to_text(&self) -> String {
        format!("✓ Removed pattern '{}' ({})\n", self.name, self.id)
    }
}

impl TextOutput for PatternToggled {
    fn to_text(&self) -> String {
        let state = if self.enabled { "enabled" } else { "disabled" };
        format!("✓ Pattern {} is now {}\n", self.id, state)
    }
}

impl TextOutput for PatternDuplicated {
    fn to_text(&self) -> String {
        format!(
            "✓ Duplicated {} as '{}' ({})\n",
            self.source_id, self.name, self.id
        )
    }
}

impl TextOutput for PatternsImported {
    fn to_text(&self) -> String {
        format!(
            "✓ Imported {} pattern(s), store now holds {}\n",
            self.imported, self.total
        )
    }
}

impl TextOutput for PatternsExported {
    fn to_text(&self) -> String {
        format!(
            "✓ Exported {} pattern(s) to {}\n",
            self.exported,
            self.path.display()
        )
    }
}

impl TextOutput for TestReport {
    fn to_text(&self) -> String {
        let mut out = String::from("PATTERN TEST\n");
        out.push_str(&"─".repeat(60));
        out.push('\n');
        let kind = if self.is_regex { "regex" } else { "literal" };
        let case = if self.case_sensitive {
            "case-sensitive"
        } else {
            "case-insensitive"
        };
        out.push_str(&format!(
            "Expression ({}, {}): {}\n",
            kind, case, self.expression
        ));
        out.push_str(&format!("Source: {}\n", self.source));

        if let Some(error) = &self.error {
            out.push_str(&format!("✗ Expression failed: {}\n", error));
            return out;
        }

        if self.matches.is_empty() {
            out.push_str("No matches.\n");
        } else {
            out.push_str(&format!("Matches: {}\n", self.match_count));
            for (i, m) in self.matches.iter().enumerate() {
                out.push_str(&format!("{}. offset {}: {}\n", i + 1, m.offset, m.text));
                for (name, value) in &m.named_groups {
                    out.push_str(&format!("   {} = {}\n", name, value));
                }
            }
        }
        out
    }
}

impl TextOutput for FixList {
    fn to_text(&self) -> String {
        if self.fixes.is_empty() {
            return format!("No fixes registered for pattern '{}'.\n", self.pattern_id);
        }
        let mut out = format!("FIXES FOR {}\n", self.pattern_id);
        out.push_str(&"─".repeat(60));
        out.push('\n');
        for fix in &self.fixes {
            let confirm = if fix.requires_confirmation {
                " (requires --yes)"
            } else {
                ""
            };
            out.push_str(&format!("• {} - {}{}\n", fix.id, fix.title, confirm));
            out.push_str(&format!("  {}\n", fix.description));
            out.push_str(&format!("  Action: {}\n", describe_action(&fix.action)));
        }
        out
    }
}

impl TextOutput for ApplyReport {
    fn to_text(&self) -> String {
        match &self.outcome {
            ApplyOutcome::Created { path } => format!("✓ Created {}\n", path.display()),
            ApplyOutcome::Modified { path } => format!("✓ Modified {}\n", path.display()),
            ApplyOutcome::NoChangeNeeded { path } => {
                format!("• {} already has the fix applied\n", path.display())
            }
            ApplyOutcome::Deleted { path } => format!("✓ Deleted {}\n", path.display()),
            ApplyOutcome::AlreadyAbsent { path } => {
                format!("• {} is already absent\n", path.display())
            }
            ApplyOutcome::CommandSuggested { command } => {
                format!("→ Run this in your terminal:\n  {}\n", command)
            }
            ApplyOutcome::NavigationSuggested { url } => {
                format!("→ Open in your browser:\n  {}\n", url)
            }
        }
    }
}

impl TextOutput for MigrationAnalysis {
    fn to_text(&self) -> String {
        migration_report::render(self)
    }
}

fn describe_action(action: &FixAction) -> String {
    match action {
        FixAction::FileCreate { path, .. } => format!("create file {}", path),
        FixAction::FileModify { path, transform } => {
            format!("modify file {} ({})", path, describe_transform(transform))
        }
        FixAction::FileDelete { path } => format!("delete file {}", path),
        FixAction::TerminalCommand { command } => format!("suggest command: {}", command),
        FixAction::ExternalNavigation { url } => format!("open: {}", url),
    }
}

fn describe_transform(transform: &ContentTransform) -> String {
    match transform {
        ContentTransform::SetContent { .. } => "replace contents".to_string(),
        ContentTransform::EnsureLine { line } => format!("ensure line '{}'", line),
        ContentTransform::ReplaceAll { from, to } => format!("replace '{}' with '{}'", from, to),
        ContentTransform::RemoveLines { needle } => {
            format!("drop lines containing '{}'", needle)
        }
    }
}
