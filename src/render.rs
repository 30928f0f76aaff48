//! Renderer-facing export of a styled graph.
//!
//! The shape follows what network-view widgets expect: nodes with an `id`,
//! a hover `title` and a `color`; edges with `from`/`to`, `title` and `color`.

use std::path::Path;

use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::graph::KnowledgeGraph;
use crate::style::{Color, StyleMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    pub id: String,
    /// Entity type, if the node was declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    /// Relation type.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub style: StyleMap,
}

impl RenderGraph {
    pub fn new(graph: &KnowledgeGraph, style: StyleMap) -> Self {
        let nodes = graph
            .nodes()
            .map(|entity| RenderNode {
                id: entity.name.clone(),
                title: entity.entity_type.clone(),
                color: entity
                    .entity_type
                    .as_deref()
                    .and_then(|ty| style.node_color(ty)),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|edge| RenderEdge {
                from: edge.source.to_string(),
                to: edge.target.to_string(),
                title: edge.relationship.to_string(),
                color: style.edge_color(edge.relationship),
            })
            .collect();

        Self {
            nodes,
            edges,
            style,
        }
    }

    /// Draw a fresh style map and export. Colours differ between calls
    /// unless `rng` is seeded.
    pub fn styled<R: Rng + ?Sized>(graph: &KnowledgeGraph, rng: &mut R) -> Self {
        Self::new(graph, StyleMap::for_graph(graph, rng))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!(
            "Wrote graph with {} nodes and {} edges to {}",
            self.nodes.len(),
            self.edges.len(),
            path.display()
        );
        Ok(())
    }
}
