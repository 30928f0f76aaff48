//! Typed directed multigraph built from parsed declarations.

use std::collections::HashMap;

use indexmap::IndexSet;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use super::ParsedDescription;

/// A node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    /// `None` when the node only appeared as a relationship endpoint.
    pub entity_type: Option<String>,
}

/// Edge weight: the relation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub relationship: String,
}

/// Borrowed view of one edge, endpoints resolved to names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub relationship: &'a str,
}

/// Directed multigraph keyed by entity name.
///
/// Parallel edges between the same ordered pair are kept, with the same or
/// different relation types.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<Entity, Relation>,
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize parser output.
    ///
    /// Node declarations are applied in order, so when one name is declared
    /// with several types the last declaration wins. Relationships are added
    /// afterwards and create any endpoint that was never declared.
    pub fn from_description(parsed: &ParsedDescription) -> Self {
        let mut graph = Self::new();
        for node in &parsed.nodes {
            graph.add_entity(&node.name, &node.entity_type);
        }
        for rel in &parsed.relationships {
            graph.add_relationship(&rel.source, &rel.target, &rel.relation_type);
        }
        log::debug!(
            "Built graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Insert a node or overwrite the type of an existing one.
    pub fn add_entity(&mut self, name: &str, entity_type: &str) {
        let idx = self.ensure_node(name);
        let entity = &mut self.graph[idx];
        if let Some(previous) = entity.entity_type.as_deref() {
            if previous != entity_type {
                log::debug!(
                    "Entity {} redeclared: type {} replaced by {}",
                    name,
                    previous,
                    entity_type
                );
            }
        }
        entity.entity_type = Some(entity_type.to_string());
    }

    /// Add a directed edge, creating untyped endpoints as needed.
    pub fn add_relationship(&mut self, source: &str, target: &str, relationship: &str) {
        let from = self.ensure_node(source);
        let to = self.ensure_node(target);
        self.graph.add_edge(
            from,
            to,
            Relation {
                relationship: relationship.to_string(),
            },
        );
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(Entity {
            name: name.to_string(),
            entity_type: None,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Type of the named node; `None` if the node is missing or untyped.
    pub fn node_type(&self, name: &str) -> Option<&str> {
        let idx = self.index.get(name)?;
        self.graph[*idx].entity_type.as_deref()
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.graph.node_weights()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.graph.edge_references().map(|edge| self.view(edge))
    }

    /// Outgoing edges of the named node.
    pub fn outgoing(&self, name: &str) -> Vec<EdgeView<'_>> {
        match self.index.get(name) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, Direction::Outgoing)
                .map(|edge| self.view(edge))
                .collect(),
            None => Vec::new(),
        }
    }

    fn view(&self, edge: EdgeReference<'_, Relation>) -> EdgeView<'_> {
        EdgeView {
            source: &self.graph[edge.source()].name,
            target: &self.graph[edge.target()].name,
            relationship: &self.graph[edge.id()].relationship,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn out_degree(&self, name: &str) -> usize {
        self.degree(name, Direction::Outgoing)
    }

    pub fn in_degree(&self, name: &str) -> usize {
        self.degree(name, Direction::Incoming)
    }

    fn degree(&self, name: &str, direction: Direction) -> usize {
        self.index
            .get(name)
            .map(|&idx| self.graph.edges_directed(idx, direction).count())
            .unwrap_or(0)
    }

    /// Distinct entity types present, untyped nodes excluded.
    pub fn entity_types(&self) -> IndexSet<&str> {
        self.graph
            .node_weights()
            .filter_map(|entity| entity.entity_type.as_deref())
            .collect()
    }

    /// Distinct relation types present.
    pub fn relationship_types(&self) -> IndexSet<&str> {
        self.graph
            .edge_weights()
            .map(|relation| relation.relationship.as_str())
            .collect()
    }
}
