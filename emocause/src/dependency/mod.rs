//! Dependency index and dependency-based modifier collection.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

mod modifiers;
pub use self::modifiers::{modifiers, prepositional_objects};

/// A typed governor -> dependent relation.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct DependencyEdge {
    governor: usize,
    dependent: usize,
    relation: String,
}

impl DependencyEdge {
    pub fn new(governor: usize, relation: impl Into<String>, dependent: usize) -> Self {
        DependencyEdge {
            governor,
            dependent,
            relation: relation.into(),
        }
    }

    pub fn governor(&self) -> usize {
        self.governor
    }

    pub fn dependent(&self) -> usize {
        self.dependent
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }
}

/// Read-only index over the dependency edges of a sentence.
///
/// Every token of the sentence is a node of the graph, edges run from
/// the governor to the dependent. Multiple edges may share a governor
/// and, since collapsed dependencies are not guaranteed to be trees,
/// a dependent may have more than one governor.
#[derive(Clone, Debug)]
pub struct DependencyIndex {
    graph: DiGraph<(), String>,
}

impl DependencyIndex {
    /// Construct the index for a sentence of `len` tokens.
    ///
    /// Fails when an edge refers to a token outside the sentence.
    pub fn new<I>(len: usize, edges: I) -> Result<Self, ContractError>
    where
        I: IntoIterator<Item = DependencyEdge>,
    {
        let mut graph = DiGraph::with_capacity(len, len);
        for _ in 0..len {
            graph.add_node(());
        }

        for edge in edges {
            if edge.governor >= len || edge.dependent >= len {
                return Err(ContractError::EdgeOutOfRange {
                    governor: edge.governor,
                    dependent: edge.dependent,
                    relation: edge.relation,
                    len,
                });
            }

            graph.add_edge(
                NodeIndex::new(edge.governor),
                NodeIndex::new(edge.dependent),
                edge.relation,
            );
        }

        Ok(DependencyIndex { graph })
    }

    /// Get the dependents of `governor` with their relations.
    ///
    /// The iteration order is unspecified. A governor outside the
    /// sentence has no dependents.
    pub fn dependents<'a>(
        &'a self,
        governor: usize,
    ) -> Box<dyn Iterator<Item = (usize, &'a str)> + 'a> {
        if governor >= self.len() {
            return Box::new(std::iter::empty());
        }

        Box::new(
            self.graph
                .edges_directed(NodeIndex::new(governor), Direction::Outgoing)
                .map(|e| (e.target().index(), e.weight().as_str())),
        )
    }

    /// Get the dependents of `governor` that are attached with one of
    /// the relations accepted by `relation`, in sentence order.
    pub fn dependents_with<F>(&self, governor: usize, relation: F) -> Vec<usize>
    where
        F: Fn(&str) -> bool,
    {
        let mut dependents = self
            .dependents(governor)
            .filter(|&(_, rel)| relation(rel))
            .map(|(dep, _)| dep)
            .collect::<Vec<_>>();
        dependents.sort_unstable();
        dependents.dedup();
        dependents
    }

    /// Get all edges of the sentence.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge> + '_ {
        self.graph.edge_references().map(|e| {
            DependencyEdge::new(e.source().index(), e.weight().clone(), e.target().index())
        })
    }

    /// Get the number of tokens covered by the index.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
