use std::slice;

use super::{NodeId, Span, Tree};
use crate::constants::{BAR_SUFFIX, EXCLUDED_LABELS, MARKER_LABELS, PP_LABEL};

/// Token ranges that are skipped when a constituent is linearized.
///
/// The ranges are disjoint and sorted by their start index.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExcludedSpans(Vec<Span>);

impl ExcludedSpans {
    /// Check whether the token at `index` is excluded.
    pub fn contains(&self, index: usize) -> bool {
        self.0.iter().any(|span| span.contains(index))
    }

    pub fn iter(&self) -> slice::Iter<Span> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Span>> for ExcludedSpans {
    fn from(mut spans: Vec<Span>) -> Self {
        spans.sort_unstable();
        ExcludedSpans(spans)
    }
}

impl<'a> IntoIterator for &'a ExcludedSpans {
    type Item = &'a Span;
    type IntoIter = slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Compute the token ranges of `node` that should not be part of its
/// linearization.
///
/// The following descendants are excluded as a whole, without looking
/// further into them:
///
/// * prepositional phrases;
/// * subordinate clauses (`SBAR`);
/// * quotes, commas, colons and the `_` label.
///
/// When `node` itself is a prepositional phrase or a bar-level
/// constituent, its leading preposition or complementizer (`IN`/`TO`)
/// is excluded, so that "that Mary left" linearizes as "Mary left".
pub fn excluded_spans(tree: &Tree, node: NodeId) -> ExcludedSpans {
    let mut spans = Vec::new();

    let label = tree.label(node);
    if label == PP_LABEL || (label.ends_with(BAR_SUFFIX) && label != BAR_SUFFIX) {
        if let Some(&marker) = tree.children(node).first() {
            if MARKER_LABELS.contains(tree.label(marker)) && tree.children(node).len() > 1 {
                spans.push(tree.span(marker));
            }
        }
    }

    collect_excluded(tree, node, &mut spans);

    ExcludedSpans::from(spans)
}

fn collect_excluded(tree: &Tree, node: NodeId, spans: &mut Vec<Span>) {
    if tree.is_leaf(node) || tree.is_preterminal(node) {
        return;
    }

    for &child in tree.children(node) {
        let label = tree.label(child);
        if label == PP_LABEL || EXCLUDED_LABELS.contains(label) {
            spans.push(tree.span(child));
        } else {
            collect_excluded(tree, child, spans);
        }
    }
}
