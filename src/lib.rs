pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod ingest;
pub mod query;
pub mod render;
pub mod session;
pub mod style;

pub use config::Config;
pub use error::{Result, TwingraphError};
pub use graph::{parse_description, traverse, KnowledgeGraph, ParsedDescription};
pub use query::{QueryFacade, QueryOutcome};
pub use session::Session;
pub use style::{Color, StyleMap};
