use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use labelforge_model::{depth_first, Element};
use std::collections::HashSet;

/// Exactly one root, at the top level
pub struct RootInvariantRule;

impl LintRule for RootInvariantRule {
    fn name(&self) -> &'static str {
        "root-invariant"
    }

    fn description(&self) -> &'static str {
        "A template has exactly one root element, at the top level"
    }

    fn check_tree(&self, tree: &[Element]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let top_level_roots = tree.iter().filter(|e| e.element_type.is_root()).count();

        if top_level_roots == 0 {
            diagnostics.push(
                Diagnostic::error(self.name(), "Template has no root element")
                    .with_suggestion("Wrap the top-level elements in a \"__body\" element"),
            );
        }
        if tree.len() > 1 {
            diagnostics.push(
                Diagnostic::error(
                    self.name(),
                    format!("Template has {} top-level elements, expected 1", tree.len()),
                )
                .with_suggestion("Move the extra elements into the root"),
            );
        }

        for element in depth_first(tree) {
            for child in element.children().unwrap_or_default() {
                if child.element_type.is_root() {
                    diagnostics.push(
                        Diagnostic::error(self.name(), "Root element nested inside another element")
                            .on(&child.id),
                    );
                }
            }
        }

        diagnostics
    }
}

/// Ids are unique across the whole tree
pub struct UniqueIdsRule;

impl LintRule for UniqueIdsRule {
    fn name(&self) -> &'static str {
        "unique-ids"
    }

    fn description(&self) -> &'static str {
        "Element ids must be unique across the template"
    }

    fn check_tree(&self, tree: &[Element]) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();

        depth_first(tree)
            .filter(|element| !seen.insert(&element.id) && reported.insert(&element.id))
            .map(|element| {
                Diagnostic::error(self.name(), format!("Duplicate element id '{}'", element.id))
                    .on(&element.id)
                    .with_suggestion("Only the first element with this id can be edited")
            })
            .collect()
    }
}
