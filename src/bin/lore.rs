//! Lore CLI
//!
//! Ask natural-language questions about the Dark Souls knowledge graph.

use anyhow::Context;
use clap::{Parser, Subcommand};
use lore_graph_qa::{Config, GraphQa, LlmClient, Neo4jHttpClient, NormalizeOrder};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Lore CLI - Dark Souls graph question answering
#[derive(Parser)]
#[command(name = "lore")]
#[command(about = "Ask questions about Dark Souls lore backed by a Neo4j knowledge graph", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.lore/config.json when present)
    #[arg(long, env = "LORE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Normalization order: strip-first or canonicalize-first (overrides config)
    #[arg(long, global = true)]
    order: Option<NormalizeOrder>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one question
    Ask {
        /// Question in natural language
        question: String,

        /// Print {raw_query, answer} as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer questions read from stdin, one per line
    Shell,

    /// Normalize a Cypher query without running it
    Normalize {
        /// Cypher query text
        query: String,
    },
}

type Pipeline = GraphQa<LlmClient, Neo4jHttpClient>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(order) = cli.order {
        config.normalize_order = order;
    }

    match cli.command {
        Commands::Normalize { query } => {
            println!("{}", config.normalizer().normalize(&query));
        }

        Commands::Ask { question, json } => {
            let qa = build_pipeline(&config)?;
            let result = qa.answer_question(&question).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.answer);
                println!();
                println!("Cypher: {}", result.raw_query);
            }
        }

        Commands::Shell => {
            let qa = build_pipeline(&config)?;
            run_shell(&qa).await?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    config.validate()?;
    let llm = config.llm_client().context("Failed to configure LLM client")?;
    let graph = config.graph_client().context("Failed to configure Neo4j client")?;
    Ok(GraphQa::new(Arc::new(llm), graph, config.normalizer()))
}

async fn run_shell(qa: &Pipeline) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Enter your question: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            println!("Please enter a question to proceed.");
            continue;
        }

        match qa.answer_question(question).await {
            Ok(result) => {
                println!("Answer:");
                println!("{}", result.answer);
                println!("Cypher: {}", result.raw_query);
            }
            Err(e) => println!("Something went wrong: {}", e),
        }
        println!();
    }

    Ok(())
}
