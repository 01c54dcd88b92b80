use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use matrixflow::compiler::loader::{self, Imported};
use matrixflow::dsl::{ActionType, Position};
use matrixflow::nodes;
use matrixflow::runtime::store::GraphStore;
use matrixflow::templates;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the action types available on the palette
    Types,

    /// List the built-in templates
    Templates,

    /// Export a template as a new workflow file
    New {
        /// Template id or name
        #[arg(long, short)]
        template: String,

        /// Directory to write the workflow into
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },

    /// Import a workflow file and report what was found
    Inspect {
        /// Path to the workflow JSON file
        file: PathBuf,
    },

    /// Add a node to a workflow file
    AddNode {
        file: PathBuf,

        /// Action type identifier, e.g. sendMessage
        #[arg(long = "type", short = 't')]
        kind: String,

        /// Canvas position; a random spot is used when omitted
        #[arg(long, requires = "y")]
        x: Option<f64>,

        #[arg(long, requires = "x")]
        y: Option<f64>,
    },

    /// Connect two nodes of a workflow file
    Connect {
        file: PathBuf,
        source: String,
        target: String,
    },

    /// Remove a node and its connections from a workflow file
    RemoveNode {
        file: PathBuf,
        id: String,
    },

    /// Write a copy of a workflow with fresh ids
    Duplicate {
        file: PathBuf,

        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
}

async fn open(file: &Path) -> Result<GraphStore> {
    let Imported { workflow, issues } = loader::read_workflow_file(file)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;
    for issue in &issues {
        warn!("{}", issue);
    }

    let mut store = GraphStore::new();
    store.load_workflow(workflow);
    Ok(store)
}

/// Rewrites `file` in place with the store's export document.
fn save(store: &mut GraphStore, file: &Path) -> Result<()> {
    let json = loader::to_json(&store.export())?;
    std::fs::write(file, json).with_context(|| format!("Failed to write {}", file.display()))?;
    info!(file = %file.display(), "Saved workflow");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Types => {
            for meta in nodes::all() {
                println!("{:<16} {:<16} {}", meta.kind, meta.label, meta.description);
            }
        }

        Commands::Templates => {
            for template in templates::all() {
                let workflow = template.workflow();
                println!(
                    "{:<14} {:<24} {} actions, {} connections",
                    template.id,
                    template.name,
                    workflow.nodes.len(),
                    workflow.edges.len()
                );
            }
        }

        Commands::New { template, out } => {
            let workflow = templates::instantiate(&template)
                .ok_or_else(|| anyhow!("Unknown template: {}", template))?;

            let mut store = GraphStore::new();
            store.load_workflow(workflow);
            let path = loader::write_workflow(&out, &store.export())?;
            println!("{}", path.display());
        }

        Commands::Inspect { file } => {
            let Imported { workflow, issues } = loader::read_workflow_file(&file)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;

            println!("{} ({} actions, {} connections)", workflow.name, workflow.nodes.len(), workflow.edges.len());
            for node in &workflow.nodes {
                println!("  {:<32} {:<16} {}", node.id, node.kind, node.data.label);
            }
            for edge in &workflow.edges {
                println!("  {} -> {}", edge.source, edge.target);
            }
            for issue in &issues {
                println!("warning: {}", issue);
            }
        }

        Commands::AddNode { file, kind, x, y } => {
            let mut store = open(&file).await?;
            let kind: ActionType = kind.parse()?;
            let id = match (x, y) {
                (Some(x), Some(y)) => store.create_node(kind, Position::new(x, y))?,
                _ => store.add_node(kind)?,
            };
            save(&mut store, &file)?;
            println!("{}", id);
        }

        Commands::Connect { file, source, target } => {
            let mut store = open(&file).await?;
            for endpoint in [&source, &target] {
                if store.node(endpoint).is_none() {
                    warn!(node_id = %endpoint, "Connecting to a node that does not exist");
                }
            }
            let id = store.connect(&source, &target);
            save(&mut store, &file)?;
            println!("{}", id);
        }

        Commands::RemoveNode { file, id } => {
            let mut store = open(&file).await?;
            store.remove_node(&id)?;
            save(&mut store, &file)?;
        }

        Commands::Duplicate { file, out } => {
            let mut store = open(&file).await?;
            let copy = store.duplicate();
            store.load_workflow(copy);
            let path = loader::write_workflow(&out, &store.export())?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
