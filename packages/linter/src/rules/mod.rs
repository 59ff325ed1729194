mod content;
mod references;
mod structure;

pub use content::{CheckboxSelectionRule, EmptyMediaRule, UnknownTypeRule};
pub use references::DanglingReferenceRule;
pub use structure::{RootInvariantRule, UniqueIdsRule};

use crate::diagnostic::Diagnostic;
use labelforge_model::Element;

/// Trait for implementing lint rules
pub trait LintRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check the tree as a whole (runs once)
    fn check_tree(&self, _tree: &[Element]) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check one element (runs for every element, depth-first)
    fn check_element(&self, _element: &Element, _tree: &[Element]) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RootInvariantRule),
                Box::new(UniqueIdsRule),
                Box::new(UnknownTypeRule),
                Box::new(DanglingReferenceRule),
                Box::new(EmptyMediaRule),
                Box::new(CheckboxSelectionRule),
            ],
        }
    }

    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}
