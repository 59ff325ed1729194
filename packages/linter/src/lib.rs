//! Checks for template documents: structural invariants the editor relies
//! on, plus content that will not render or answer as intended.

mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{lint_source, lint_template, LintOptions};
pub use rules::{LintRule, RuleRegistry};
