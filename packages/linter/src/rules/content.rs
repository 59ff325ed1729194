use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use labelforge_model::{Element, ElementContent, ElementType};

/// Element types this version cannot render
pub struct UnknownTypeRule;

impl LintRule for UnknownTypeRule {
    fn name(&self) -> &'static str {
        "unknown-type"
    }

    fn description(&self) -> &'static str {
        "Elements of unknown type are kept but not rendered"
    }

    fn check_element(&self, element: &Element, _tree: &[Element]) -> Vec<Diagnostic> {
        match &element.element_type {
            ElementType::Unknown(tag) if tag.is_empty() => vec![Diagnostic::warning(
                self.name(),
                "Element has no type and will not be rendered",
            )
            .on(&element.id)],
            ElementType::Unknown(tag) => vec![Diagnostic::warning(
                self.name(),
                format!("Unknown element type '{tag}' will not be rendered"),
            )
            .on(&element.id)],
            _ => Vec::new(),
        }
    }
}

/// Media elements that have nothing to show yet
pub struct EmptyMediaRule;

impl LintRule for EmptyMediaRule {
    fn name(&self) -> &'static str {
        "empty-media"
    }

    fn description(&self) -> &'static str {
        "Image, video, audio, and carousel elements should have a source"
    }

    fn check_element(&self, element: &Element, _tree: &[Element]) -> Vec<Diagnostic> {
        let empty = match &element.content {
            ElementContent::Media(media) => media.src.trim().is_empty(),
            ElementContent::Carousel(carousel) => carousel.slides.is_empty(),
            _ => false,
        };

        if empty {
            vec![Diagnostic::info(
                self.name(),
                format!("{} '{}' has no source", element.element_type.display_name(), element.name),
            )
            .on(&element.id)
            .with_suggestion("Upload a file or paste a URL in the element settings")]
        } else {
            Vec::new()
        }
    }
}

/// Selected checkbox values must be among the options
pub struct CheckboxSelectionRule;

impl LintRule for CheckboxSelectionRule {
    fn name(&self) -> &'static str {
        "checkbox-selection"
    }

    fn description(&self) -> &'static str {
        "Selected checkbox values must be one of the element's options"
    }

    fn check_element(&self, element: &Element, _tree: &[Element]) -> Vec<Diagnostic> {
        let ElementContent::Checkbox(checkbox) = &element.content else {
            return Vec::new();
        };

        checkbox
            .selected_checkbox
            .iter()
            .filter(|selected| !checkbox.checkboxes.contains(selected))
            .map(|selected| {
                Diagnostic::warning(
                    self.name(),
                    format!("Selected value '{selected}' is not one of the options"),
                )
                .on(&element.id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelforge_model::{CheckboxContent, MediaContent};

    #[test]
    fn test_unknown_type_is_flagged() {
        let element = Element::new("x", ElementType::Unknown("hologram".into()));
        let diagnostics = UnknownTypeRule.check_element(&element, &[]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("hologram"));
    }

    #[test]
    fn test_empty_media_is_info_only() {
        let empty = Element::new("i", ElementType::Image);
        let diagnostics = EmptyMediaRule.check_element(&empty, &[]);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());

        let full = Element::new("i", ElementType::Image).with_content(ElementContent::Media(MediaContent {
            src: "a.png".into(),
            ..Default::default()
        }));
        assert!(EmptyMediaRule.check_element(&full, &[]).is_empty());
    }

    #[test]
    fn test_stray_checkbox_selection() {
        let element = Element::new("c", ElementType::Checkbox).with_content(ElementContent::Checkbox(
            CheckboxContent {
                checkboxes: vec!["cat".into(), "dog".into()],
                selected_checkbox: vec!["dog".into(), "bird".into()],
                ..Default::default()
            },
        ));
        let diagnostics = CheckboxSelectionRule.check_element(&element, &[]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("bird"));
    }
}
