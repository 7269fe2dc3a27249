//! Constituency trees.
//!
//! Trees are stored as an arena of nodes. Each node records the index
//! of its parent, which is only used for ancestor queries. The tree is
//! never modified after it is read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BAR_SUFFIX;

mod excluder;
pub use self::excluder::{excluded_spans, ExcludedSpans};

mod navigator;
pub use self::navigator::{find_constituent, maximal_projection, SearchDirection};

mod reader;
pub use self::reader::{TreeError, MAX_TREE_DEPTH};

/// Inclusive range of token indices.
#[allow(clippy::len_without_is_empty)]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Construct a span.
    ///
    /// Panics when `end` is smaller than `start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "Span end {} before start {}", end, start);
        Span { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the last token index of the span (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Get the number of tokens in the span.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Index of a node in a `Tree`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct Node {
    label: String,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable constituency tree.
///
/// Terminals are the leaves of the tree, the label of a terminal is the
/// word. The parent of a terminal is its pre-terminal (part-of-speech)
/// node.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    leaves: Vec<NodeId>,
}

impl Tree {
    /// Get the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node.0].label
    }

    pub fn span(&self, node: NodeId) -> Span {
        self.nodes[node.0].span
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Get the terminal of the token at `index`.
    pub fn leaf(&self, index: usize) -> Option<NodeId> {
        self.leaves.get(index).copied()
    }

    /// Get the terminals in sentence order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.children(node).is_empty()
    }

    /// Check whether a node only dominates a terminal.
    pub fn is_preterminal(&self, node: NodeId) -> bool {
        let children = self.children(node);
        children.len() == 1 && self.is_leaf(children[0])
    }

    /// Get the ancestor of `node` at the given height.
    ///
    /// Height 0 is the node itself, height 1 its parent. Returns `None`
    /// when the ancestor would be above the root.
    pub fn ancestor(&self, node: NodeId, height: usize) -> Option<NodeId> {
        let mut ancestor = node;
        for _ in 0..height {
            ancestor = self.parent(ancestor)?;
        }
        Some(ancestor)
    }

    /// Check whether `node` has the category `label` or its bar-level
    /// variant, e.g. `S` or `SBAR`.
    pub fn has_category(&self, node: NodeId, label: &str) -> bool {
        self.label(node)
            .strip_prefix(label)
            .map(|suffix| suffix.is_empty() || suffix == BAR_SUFFIX)
            .unwrap_or(false)
    }

    /// Check whether `node` dominates `other` (or is `other`).
    pub fn dominates(&self, node: NodeId, other: NodeId) -> bool {
        let mut current = Some(other);
        while let Some(candidate) = current {
            if candidate == node {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Get the number of nodes, including terminals.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn fmt_node(&self, node: NodeId, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_leaf(node) {
            return f.write_str(self.label(node));
        }

        write!(f, "({}", self.label(node))?;
        for &child in self.children(node) {
            f.write_str(" ")?;
            self.fmt_node(child, f)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_node(self.root(), f)
    }
}
