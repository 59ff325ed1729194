use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use labelforge_model::{contains_element, Element, ElementContent, ElementId};

/// Translation targets that point at elements no longer in the tree.
///
/// The editor tolerates these; translating such an element fails until a
/// new target is chosen.
pub struct DanglingReferenceRule;

impl LintRule for DanglingReferenceRule {
    fn name(&self) -> &'static str {
        "dangling-reference"
    }

    fn description(&self) -> &'static str {
        "Dynamic text must reference an existing element"
    }

    fn check_element(&self, element: &Element, tree: &[Element]) -> Vec<Diagnostic> {
        let ElementContent::DynamicText(content) = &element.content else {
            return Vec::new();
        };
        let Some(target) = content.translation_target.as_deref() else {
            return Vec::new();
        };

        if contains_element(tree, &ElementId::from(target)) {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            self.name(),
            format!("Translation target '{target}' does not exist"),
        )
        .on(&element.id)
        .with_suggestion("Pick another element to translate from")]
    }
}
