//! Read-only lookups over a template tree

use crate::element::{Element, ElementId};

/// Depth-first (pre-order) iterator over every element in a tree
pub struct DepthFirst<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        if let Some(children) = element.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(element)
    }
}

/// Walk `tree` depth-first in document order
pub fn depth_first(tree: &[Element]) -> DepthFirst<'_> {
    DepthFirst {
        stack: tree.iter().rev().collect(),
    }
}

/// Find the first element (depth-first) with the given id
pub fn find_element<'a>(tree: &'a [Element], id: &ElementId) -> Option<&'a Element> {
    depth_first(tree).find(|element| &element.id == id)
}

pub fn contains_element(tree: &[Element], id: &ElementId) -> bool {
    find_element(tree, id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    fn sample() -> Vec<Element> {
        vec![Element::root().with_children(vec![
            Element::new("a", ElementType::Container)
                .with_children(vec![Element::new("a1", ElementType::Text)]),
            Element::new("b", ElementType::Image),
        ])]
    }

    #[test]
    fn test_depth_first_order() {
        let tree = sample();
        let ids: Vec<&str> = depth_first(&tree).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["__body", "a", "a1", "b"]);
    }

    #[test]
    fn test_find_nested() {
        let tree = sample();
        let id = ElementId::from("a1");
        assert_eq!(find_element(&tree, &id).unwrap().element_type, ElementType::Text);
        assert!(!contains_element(&tree, &ElementId::from("zzz")));
    }
}
