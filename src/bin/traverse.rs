//! Breadth-first walk of a saved graph description from one entity.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use twingraph::{parse_description, traverse, KnowledgeGraph};

#[derive(Parser, Debug)]
#[command(name = "traverse")]
#[command(about = "Walk outgoing relationships of a graph description from a start entity")]
struct Args {
    /// Description text file
    file: PathBuf,

    /// Entity to start from
    #[arg(short, long)]
    start: String,

    /// Only follow these relation types (repeatable)
    #[arg(short, long = "relation")]
    relations: Vec<String>,

    /// Maximum number of hops
    #[arg(short, long, default_value = "2")]
    depth: usize,

    /// Print edges as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read description file: {}", args.file.display()))?;
    let graph = KnowledgeGraph::from_description(&parse_description(&text));

    if !graph.contains(&args.start) {
        log::warn!("Entity {} not found in {}", args.start, args.file.display());
        return Ok(());
    }

    let filter = (!args.relations.is_empty()).then_some(args.relations.as_slice());
    let edges = traverse(&graph, &args.start, filter, args.depth);
    log::info!("Found {} edges within {} hops of {}", edges.len(), args.depth, args.start);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&edges)?);
    } else {
        for edge in &edges {
            let target_type = graph.node_type(edge.target).unwrap_or("?");
            println!(
                "{} -[{}]-> {} ({})",
                edge.source, edge.relationship, edge.target, target_type
            );
        }
    }

    Ok(())
}
