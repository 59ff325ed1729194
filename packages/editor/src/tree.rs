//! # Tree Mutator
//!
//! Pure structural edits over a template tree. Every operation takes the
//! current tree by reference and returns a new one; the input is never
//! modified.
//!
//! All three edits are built on one walk, [`edit_first`], which visits
//! elements depth-first in document order and lets a visitor replace or
//! remove the first element it is interested in. Only the path from the
//! edited element up to the top level is rebuilt; untouched siblings are
//! cloned as-is.
//!
//! Element ids are minted by the caller (see `IdGenerator`), never here.

use labelforge_model::{depth_first, Element, ElementContent, ElementId};
use std::collections::HashSet;
use tracing::debug;

/// What a visitor wants done with the element it was shown
enum Visit {
    /// Not interested, keep searching (including below this element)
    Skip,
    Replace(Element),
    Remove,
    /// This is the target but it cannot be edited; stop searching
    Halt,
}

enum Walk {
    Edited(Vec<Element>),
    Halted,
    Missed,
}

fn edit_first<F>(tree: &[Element], visit: &mut F) -> Walk
where
    F: FnMut(&Element) -> Visit,
{
    for (index, element) in tree.iter().enumerate() {
        match visit(element) {
            Visit::Replace(replacement) => return Walk::Edited(splice(tree, index, Some(replacement))),
            Visit::Remove => return Walk::Edited(splice(tree, index, None)),
            Visit::Halt => return Walk::Halted,
            Visit::Skip => {}
        }

        if let Some(children) = element.children() {
            match edit_first(children, visit) {
                Walk::Edited(children) => {
                    let parent = Element {
                        id: element.id.clone(),
                        element_type: element.element_type.clone(),
                        name: element.name.clone(),
                        styles: element.styles.clone(),
                        content: ElementContent::Children(children),
                    };
                    return Walk::Edited(splice(tree, index, Some(parent)));
                }
                Walk::Halted => return Walk::Halted,
                Walk::Missed => {}
            }
        }
    }

    Walk::Missed
}

fn splice(tree: &[Element], index: usize, replacement: Option<Element>) -> Vec<Element> {
    let mut next = Vec::with_capacity(tree.len());
    next.extend_from_slice(&tree[..index]);
    next.extend(replacement);
    next.extend_from_slice(&tree[index + 1..]);
    next
}

fn edited(walk: Walk) -> Option<Vec<Element>> {
    match walk {
        Walk::Edited(tree) => Some(tree),
        Walk::Halted | Walk::Missed => None,
    }
}

/// Whether `element` is addressed by `container_id`.
///
/// The root sentinels (`"__body"`, `"root"`) address the root element
/// whatever its actual id is.
fn addresses(container_id: &ElementId, element: &Element) -> bool {
    &element.id == container_id
        || (container_id.is_root_sentinel() && element.element_type.is_root())
}

/// Whether grafting `incoming` into `tree` would add a second root or a
/// duplicate id. Ids below `replaced` are about to leave the tree and may be
/// reused.
fn breaks_invariants(tree: &[Element], incoming: &[Element], replaced: Option<&Element>) -> bool {
    let mut seen = HashSet::new();
    for node in depth_first(incoming) {
        if node.element_type.is_root() {
            debug!(id = %node.id, "Refusing to graft a second root");
            return true;
        }
        if !seen.insert(&node.id) {
            debug!(id = %node.id, "Refusing to graft a subtree with a repeated id");
            return true;
        }
    }

    let leaving: HashSet<&ElementId> = replaced
        .and_then(Element::children)
        .map(|children| depth_first(children).map(|e| &e.id).collect())
        .unwrap_or_default();
    let clash = depth_first(tree).find(|e| seen.contains(&e.id) && !leaving.contains(&e.id));
    if let Some(existing) = clash {
        debug!(id = %existing.id, "Refusing to graft an id already in the tree");
        return true;
    }
    false
}

/// Append `element` to the children of the container `container_id`.
///
/// Returns `None` when nothing changed: the target is missing or is a leaf,
/// or the new subtree holds a root or an id that is already taken.
pub fn try_add_element(
    tree: &[Element],
    container_id: &ElementId,
    element: Element,
) -> Option<Vec<Element>> {
    if breaks_invariants(tree, std::slice::from_ref(&element), None) {
        return None;
    }

    let mut element = Some(element);
    let result = edited(edit_first(tree, &mut |candidate: &Element| {
        if !addresses(container_id, candidate) {
            return Visit::Skip;
        }
        match (candidate.children(), element.take()) {
            (Some(children), Some(new_child)) => {
                let mut children = children.to_vec();
                children.push(new_child);
                Visit::Replace(Element {
                    content: ElementContent::Children(children),
                    ..candidate.clone()
                })
            }
            _ => Visit::Halt,
        }
    }));

    if result.is_none() {
        debug!(container = %container_id, "Add target is not a container in this tree");
    }
    result
}

/// Append `element` under `container_id`; the tree is unchanged if the
/// target does not resolve to a container.
pub fn add_element(tree: &[Element], container_id: &ElementId, element: Element) -> Vec<Element> {
    try_add_element(tree, container_id, element).unwrap_or_else(|| tree.to_vec())
}

/// Replace name, styles, and content of the element with `details.id`.
///
/// The target keeps its id and type. Returns `None` when the id is missing,
/// `details.content` is not a valid payload for the target's type, or new
/// children would bring in a root or a duplicate id.
pub fn try_update_element(tree: &[Element], details: &Element) -> Option<Vec<Element>> {
    edited(edit_first(tree, &mut |candidate: &Element| {
        if candidate.id != details.id {
            return Visit::Skip;
        }
        if !details.content.fits(&candidate.element_type) {
            debug!(id = %details.id, "Update content does not fit the element type");
            return Visit::Halt;
        }
        if let Some(children) = details.children() {
            if breaks_invariants(tree, children, Some(candidate)) {
                return Visit::Halt;
            }
        }
        Visit::Replace(Element {
            id: candidate.id.clone(),
            element_type: candidate.element_type.clone(),
            name: details.name.clone(),
            styles: details.styles.clone(),
            content: details.content.clone(),
        })
    }))
}

pub fn update_element(tree: &[Element], details: &Element) -> Vec<Element> {
    try_update_element(tree, details).unwrap_or_else(|| tree.to_vec())
}

/// Remove the element with `id` and its whole subtree.
///
/// The root element is never removed. Returns `None` when nothing changed.
pub fn try_delete_element(tree: &[Element], id: &ElementId) -> Option<Vec<Element>> {
    edited(edit_first(tree, &mut |candidate: &Element| {
        if &candidate.id != id {
            Visit::Skip
        } else if candidate.element_type.is_root() {
            debug!(id = %id, "Refusing to delete the root element");
            Visit::Halt
        } else {
            Visit::Remove
        }
    }))
}

pub fn delete_element(tree: &[Element], id: &ElementId) -> Vec<Element> {
    try_delete_element(tree, id).unwrap_or_else(|| tree.to_vec())
}
