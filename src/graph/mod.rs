//! Knowledge graph module: description parsing, graph building and BFS traversal.
//!
//! Parses the node/relationship notation produced by the text generator into
//! raw declarations, then materializes them as a typed directed multigraph.

mod builder;
mod parser;
mod traversal;

pub use builder::{EdgeView, Entity, KnowledgeGraph, Relation};
pub use parser::parse_description;
pub use traversal::traverse;

use serde::{Deserialize, Serialize};

/// A node declaration `(name:Type {...})`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeDecl {
    /// Entity name, e.g. `Audi`.
    pub name: String,
    /// Entity type, e.g. `Brand`.
    pub entity_type: String,
}

/// A relationship declaration `(source)-[:RELATION_TYPE {...}]->(target)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDecl {
    pub source: String,
    pub target: String,
    /// Relation type, e.g. `HAS_BRAND`.
    pub relation_type: String,
}

/// Everything extracted from one description text.
///
/// `nodes` holds distinct `(name, type)` pairs; the same name may appear with
/// two different types. `relationships` keeps duplicates in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDescription {
    pub nodes: Vec<NodeDecl>,
    pub relationships: Vec<RelationshipDecl>,
}

impl ParsedDescription {
    /// True when neither a node nor a relationship was found.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }
}
