use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use twingraph::generator::HttpGenerator;
use twingraph::session::LoadedGraph;
use twingraph::{Config, QueryOutcome, Session};

#[derive(Parser, Debug)]
#[command(name = "twingraph")]
#[command(version, about = "Turn data files into a typed knowledge graph and ask questions about it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load data files, generate a graph description, and export the graph
    Build {
        /// JSON, YAML or CSV files, or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Where to write the render JSON (defaults to render.output_path)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also save the generated description text
        #[arg(long)]
        description_out: Option<PathBuf>,

        /// Seed for the colour draw (defaults to render.seed, else random)
        #[arg(long)]
        seed: Option<u64>,

        /// After building, read questions from stdin and answer them
        #[arg(short, long)]
        interactive: bool,
    },
    /// Ask a question about a saved description
    Ask {
        /// Description text file
        #[arg(short, long)]
        description: PathBuf,

        /// The question
        #[arg(default_value = "")]
        question: String,
    },
    /// Parse a saved description offline and export the graph
    Parse {
        /// Description text file
        file: PathBuf,

        /// Where to write the render JSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Seed for the colour draw (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logger(default_level: &str) {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", default_level)
    ).init();
}

fn build_generator(config: &Config) -> Result<HttpGenerator> {
    let api_key = config.api_key()?;
    Ok(HttpGenerator::new(&config.generator, api_key)?)
}

fn color_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}

fn read_description(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read description file: {}", path.display()))
}

fn print_outcome(outcome: &QueryOutcome) {
    match outcome {
        QueryOutcome::Answer(answer) => println!("{}", answer),
        QueryOutcome::MissingQuestion => eprintln!("{}", outcome.message()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            paths,
            out,
            description_out,
            seed,
            interactive,
        } => run_build(paths, out, description_out, seed, interactive).await,
        Command::Ask {
            description,
            question,
        } => run_ask(&description, &question).await,
        Command::Parse { file, out, seed } => {
            init_logger("info");
            run_parse(&file, out.as_deref(), seed)
        }
    }
}

/// Full pipeline: records -> description -> graph -> render JSON
async fn run_build(
    paths: Vec<PathBuf>,
    out: Option<PathBuf>,
    description_out: Option<PathBuf>,
    seed: Option<u64>,
    interactive: bool,
) -> Result<()> {
    let config = Config::load()?;
    init_logger(&config.twingraph.log_level);
    log::info!("Starting Twingraph v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Text generation: {:?} / {}",
        config.generator.provider,
        config.generator.model
    );

    let mut session = Session::new(build_generator(&config)?);
    let loaded = session.load(&paths).await?;

    if let Some(path) = &description_out {
        std::fs::write(path, &loaded.description)
            .with_context(|| format!("Failed to write description: {}", path.display()))?;
        log::info!("Description saved to {}", path.display());
    }

    let out = out.unwrap_or_else(|| config.render.output_path.clone());
    let mut rng = color_rng(seed.or(config.render.seed));
    session.render(&mut *rng)?.write_json(&out)?;

    if interactive {
        chat(&session).await?;
    }

    Ok(())
}

/// Answer stdin questions one line at a time until EOF.
async fn chat(session: &Session<HttpGenerator>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("question> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let outcome = session.ask(line.trim_end_matches(['\r', '\n'])).await?;
        print_outcome(&outcome);
    }
    Ok(())
}

async fn run_ask(description: &Path, question: &str) -> Result<()> {
    let config = Config::load()?;
    init_logger(&config.twingraph.log_level);

    let mut session = Session::new(build_generator(&config)?);
    session.load_description(read_description(description)?);

    let outcome = session.ask(question).await?;
    print_outcome(&outcome);
    Ok(())
}

fn run_parse(file: &Path, out: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let loaded = LoadedGraph::from_description(read_description(file)?);
    log::info!(
        "Parsed {}: {} nodes, {} edges",
        file.display(),
        loaded.graph.node_count(),
        loaded.graph.edge_count()
    );

    let mut rng = color_rng(seed);
    let render = twingraph::render::RenderGraph::styled(&loaded.graph, &mut *rng);
    match out {
        Some(path) => render.write_json(path)?,
        None => println!("{}", render.to_json()?),
    }
    Ok(())
}
