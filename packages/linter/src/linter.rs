use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::rules::RuleRegistry;
use labelforge_model::{depth_first, deserialize, Element};
use tracing::debug;

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,
}

/// Lint a template tree and return diagnostics, most severe first
pub fn lint_template(tree: &[Element], options: LintOptions) -> Vec<Diagnostic> {
    let registry = options.registry.unwrap_or_default();
    let mut diagnostics = Vec::new();

    for rule in registry.rules() {
        diagnostics.extend(rule.check_tree(tree));
    }
    for element in depth_first(tree) {
        for rule in registry.rules() {
            diagnostics.extend(rule.check_element(element, tree));
        }
    }

    diagnostics.sort_by_key(|d| d.level);
    debug!(count = diagnostics.len(), "Linted template");
    diagnostics
}

/// Lint a persisted template document. An unreadable document yields a
/// single `parse` error.
pub fn lint_source(raw: &str, options: LintOptions) -> Vec<Diagnostic> {
    match deserialize(raw) {
        Ok(tree) => lint_template(&tree, options),
        Err(error) => vec![Diagnostic {
            level: DiagnosticLevel::Error,
            rule: "parse".to_string(),
            message: error.to_string(),
            element_id: None,
            suggestion: None,
        }],
    }
}
