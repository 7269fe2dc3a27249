use std::ops::RangeInclusive;

use super::{NodeId, Tree};
use crate::constants::{COMMA_LABEL, PP_LABEL};

/// Side of the trigger on which a constituent is searched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchDirection {
    Left,
    Right,
}

/// Find the first sibling or cousin of `leaf` with the category `label`.
///
/// The ancestors of `leaf` are visited for each height in `heights`
/// (height 1 is the pre-terminal of the leaf). An ancestor is skipped
/// when its parent is a prepositional phrase. The children of an
/// ancestor are scanned left to right:
///
/// * When searching to the right, children that end before the
///   constituent at height 2 starts are skipped.
/// * The child that contains `leaf` ends the scan when searching to the
///   left and is skipped otherwise.
/// * A child matches when it has the category `label` (or its bar-level
///   variant), is not directly followed by a comma and is not `exclude`.
///
/// Returns `None` when no ancestor within the height window has a
/// matching child.
pub fn find_constituent(
    tree: &Tree,
    leaf: NodeId,
    label: &str,
    direction: SearchDirection,
    exclude: Option<NodeId>,
    heights: RangeInclusive<usize>,
) -> Option<NodeId> {
    let first_ancestor = tree.ancestor(leaf, 2);

    for height in heights {
        let ancestor = match tree.ancestor(leaf, height) {
            Some(ancestor) => ancestor,
            None => {
                log::trace!("No ancestor at height {}, stopping search", height);
                break;
            }
        };

        if let Some(parent) = tree.parent(ancestor) {
            if tree.label(parent) == PP_LABEL {
                log::trace!("Ancestor at height {} is embedded in a PP", height);
                continue;
            }
        }

        let children = tree.children(ancestor);
        for (idx, &child) in children.iter().enumerate() {
            if direction == SearchDirection::Right {
                if let Some(first_ancestor) = first_ancestor {
                    if tree.span(child).end() < tree.span(first_ancestor).start() {
                        continue;
                    }
                }
            }

            if tree.dominates(child, leaf) {
                match direction {
                    SearchDirection::Left => break,
                    SearchDirection::Right => continue,
                }
            }

            if !tree.has_category(child, label) {
                continue;
            }

            // A constituent followed by a comma is an adjunct, e.g. a
            // temporal NP such as "this morning".
            if children
                .get(idx + 1)
                .map(|&next| tree.label(next) == COMMA_LABEL)
                .unwrap_or(false)
            {
                log::trace!("Skipping adjunct {} at height {}", tree.label(child), height);
                continue;
            }

            if Some(child) == exclude {
                continue;
            }

            log::debug!(
                "Found {} {:?} at height {}",
                tree.label(child),
                tree.span(child),
                height
            );

            return Some(child);
        }
    }

    None
}

/// Find the largest constituent of category `label` that dominates `leaf`.
///
/// This is the first ancestor within `heights` that has the category
/// `label` (or its bar-level variant) while its own parent does not.
pub fn maximal_projection(
    tree: &Tree,
    leaf: NodeId,
    label: &str,
    heights: RangeInclusive<usize>,
) -> Option<NodeId> {
    for height in heights {
        let ancestor = tree.ancestor(leaf, height)?;
        if !tree.has_category(ancestor, label) {
            continue;
        }

        let parent_matches = tree
            .parent(ancestor)
            .map(|parent| tree.has_category(parent, label))
            .unwrap_or(false);
        if !parent_matches {
            return Some(ancestor);
        }
    }

    None
}
