//! Prompt templates for the two generator calls.

use crate::error::Result;
use crate::ingest::Record;

/// Prompt asking the generator to describe `records` as a graph.
///
/// The records are embedded as pretty-printed JSON. Every declaration is
/// requested on a single line, although the parser also copes with
/// multi-line output.
pub fn description_prompt(records: &[Record]) -> Result<String> {
    let data = serde_json::to_string_pretty(records)?;
    Ok(format!(
        "Analyze the records below and describe them as a knowledge graph.\n\
         Identify one top-level class node, the entities it groups, and the \
         relationships between all entities. Infer a parent node and sensible \
         relationships when the data does not state them explicitly.\n\
         Use full entity names as node names so the graph reads well. Keep \
         properties to a minimum; the focus is nodes and edges.\n\
         Use every value in the data that matters.\n\n\
         Records:\n{data}\n\n\
         Output format, nothing else (no explanations, no UNWIND):\n\
         - node: (name:Type {{}}) where name and Type are single words of letters, digits or _\n\
         - relationship: (source)-[:RELATION_TYPE]->(target)\n\
         Put each declaration on one line and make sure every node is connected, \
         for example:\n\
         CREATE (Vehicle:Class {{}}), (Audi:Brand {{}}), (Vehicle)-[:HAS_BRAND]->(Audi)"
    ))
}

/// Prompt asking the generator to answer `question` from `description`.
///
/// Both are embedded verbatim; no retrieval or trimming is done.
pub fn answer_prompt(description: &str, question: &str) -> String {
    format!(
        "You answer questions about a dataset.\n\
         The data is the following graph description:\n\n\
         {description}\n\n\
         The user asks:\n\
         {question}\n\n\
         Give a detailed and accurate answer based only on the data."
    )
}
