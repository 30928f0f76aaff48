//! One user's working state: the current description text and its graph.
//!
//! Every load rebuilds the graph from scratch and replaces what was held
//! before. Nothing is persisted.

use std::path::PathBuf;

use rand::Rng;

use crate::error::{Result, TwingraphError};
use crate::generator::prompts::description_prompt;
use crate::generator::TextGenerator;
use crate::graph::{parse_description, KnowledgeGraph};
use crate::ingest::{load_records, Record};
use crate::query::{QueryFacade, QueryOutcome};
use crate::render::RenderGraph;

/// A description text and the graph built from it.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub description: String,
    pub graph: KnowledgeGraph,
}

impl LoadedGraph {
    /// Parse and build without calling the generator.
    pub fn from_description(description: String) -> Self {
        let parsed = parse_description(&description);
        if parsed.is_empty() {
            log::warn!("Description contained no node or relationship declarations");
        }
        let graph = KnowledgeGraph::from_description(&parsed);
        Self { description, graph }
    }
}

pub struct Session<G> {
    generator: G,
    current: Option<LoadedGraph>,
}

impl<G: TextGenerator> Session<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            current: None,
        }
    }

    /// Decode input files, have the generator describe them, and build the graph.
    pub async fn load(&mut self, paths: &[PathBuf]) -> Result<&LoadedGraph> {
        let records = load_records(paths)?;
        self.load_records(&records).await
    }

    /// Describe already-decoded records and build the graph.
    pub async fn load_records(&mut self, records: &[Record]) -> Result<&LoadedGraph> {
        let prompt = description_prompt(records)?;
        let description = self.generator.generate(&prompt).await?;
        Ok(self.load_description(description))
    }

    /// Replace the current graph with one built from `description`.
    pub fn load_description(&mut self, description: String) -> &LoadedGraph {
        let loaded = LoadedGraph::from_description(description);
        log::info!(
            "Graph loaded: {} nodes, {} edges",
            loaded.graph.node_count(),
            loaded.graph.edge_count()
        );
        self.current.insert(loaded)
    }

    pub fn current(&self) -> Option<&LoadedGraph> {
        self.current.as_ref()
    }

    pub fn graph(&self) -> Option<&KnowledgeGraph> {
        self.current.as_ref().map(|loaded| &loaded.graph)
    }

    pub fn description(&self) -> Option<&str> {
        self.current.as_ref().map(|loaded| loaded.description.as_str())
    }

    /// Export the current graph with freshly drawn colours.
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RenderGraph> {
        let loaded = self.require_loaded()?;
        Ok(RenderGraph::styled(&loaded.graph, rng))
    }

    /// Ask a question about the current description.
    pub async fn ask(&self, question: &str) -> Result<QueryOutcome> {
        let loaded = self.require_loaded()?;
        QueryFacade::new(&self.generator)
            .ask(&loaded.description, question)
            .await
    }

    fn require_loaded(&self) -> Result<&LoadedGraph> {
        self.current.as_ref().ok_or_else(|| {
            TwingraphError::InvalidInput("No graph loaded. Load data files first.".to_string())
        })
    }
}
