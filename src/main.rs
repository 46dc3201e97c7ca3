//! Bindery CLI - resolve, inspect and edit `{{path}}` bindings

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use bindery::binding::parse_dot_path;
use bindery::editor::EditorProps;
use bindery::index::suggest::preview;
use bindery::index::{NodeKind, PathNode, SuggestionEngine, TreeIndex};
use bindery::{
    load_sample_data, tui, BinderyConfig, BinderyError, BindingResolver, FixSuggestion, Result,
};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(about = "Bindery - {{path}} binding resolver and path autocompletion")]
#[command(version)]
struct Cli {
    /// Config file (default: ./bindery.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the bindings in a text
    Resolve {
        text: String,

        /// Sample data file (.json, .yaml, .yml)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Resolve every string in a props file and print it as JSON
    Render {
        /// Props file (.json, .yaml, .yml)
        props: PathBuf,

        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// List path suggestions for a fragment typed after `{{`
    Suggest {
        fragment: String,

        #[arg(short, long)]
        data: PathBuf,
    },

    /// Show the paths of a sample data file
    Tree {
        #[arg(short, long)]
        data: PathBuf,

        /// Start below this path
        #[arg(short, long)]
        path: Option<String>,

        /// Descend into every branch
        #[arg(long)]
        all: bool,
    },

    /// Interactive editor with autocomplete and explorer
    Edit {
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Initial value
        #[arg(long, default_value = "")]
        value: String,

        #[arg(long)]
        multiline: bool,

        #[arg(long)]
        placeholder: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The editor owns the screen: stay silent unless RUST_LOG asks
    let default_filter = match cli.command {
        Commands::Edit { .. } => "off",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => BinderyConfig::load_from(path)?,
        None => BinderyConfig::load()?,
    }
    .with_env();

    match cli.command {
        Commands::Resolve { text, data } => {
            let resolver = BindingResolver::with_limits(load_data(data.as_deref()).await?, config.limits);
            println!("{}", resolver.resolve(&text));
            Ok(())
        }
        Commands::Render { props, data } => {
            let props = load_sample_data(&props).await?;
            let resolver = BindingResolver::with_limits(load_data(data.as_deref()).await?, config.limits);
            let rendered = resolver.resolve_deep(&props);
            println!("{}", serde_json::to_string_pretty(&rendered)?);
            Ok(())
        }
        Commands::Suggest { fragment, data } => {
            let data = load_sample_data(&data).await?;
            suggest(&config, &data, &fragment);
            Ok(())
        }
        Commands::Tree { data, path, all } => {
            let data = load_sample_data(&data).await?;
            tree(&config, &data, path.as_deref(), all)
        }
        Commands::Edit {
            data,
            value,
            multiline,
            placeholder,
        } => {
            let label = data
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "no sample data".to_string());
            let props = EditorProps {
                value,
                sample_data: load_data(data.as_deref()).await?,
                multiline,
                placeholder,
            };
            let value = tui::run(props, &config, &label)
                .await
                .map_err(|e| BinderyError::Terminal {
                    reason: e.to_string(),
                })?;
            println!("{}", value);
            Ok(())
        }
    }
}

async fn load_data(path: Option<&Path>) -> Result<Option<Arc<Value>>> {
    match path {
        Some(path) => Ok(Some(load_sample_data(path).await?)),
        None => Ok(None),
    }
}

fn suggest(config: &BinderyConfig, data: &Value, fragment: &str) {
    let suggestions = SuggestionEngine::from_config(config).suggest(data, fragment);
    if suggestions.is_empty() {
        eprintln!("{} no paths match '{}'", "→".cyan(), fragment);
        return;
    }
    let width = suggestions.iter().map(|s| s.path.len()).max().unwrap_or(0);
    for item in suggestions {
        println!(
            "{:<width$}  {}",
            item.path,
            item.preview_value.dimmed(),
            width = width
        );
    }
}

fn tree(config: &BinderyConfig, data: &Value, path: Option<&str>, all: bool) -> Result<()> {
    let index = TreeIndex::new(data);

    let start = match path {
        Some(raw) => {
            let normalized = parse_dot_path(raw)?.to_string();
            if index.value_at(&normalized).is_none() {
                return Err(BinderyError::PathNotFound {
                    path: raw.to_string(),
                });
            }
            normalized
        }
        None => String::new(),
    };
    let base_depth = index.node(&start).map_or(0, |n| n.depth + 1);

    let nodes: Vec<PathNode> = if all {
        // Depth-first so children print under their parent
        let mut out = Vec::new();
        collect_all(&index, &start, config.limits.max_index_nodes, &mut out);
        out
    } else {
        index.children_of(&start)
    };

    for node in nodes {
        let indent = "  ".repeat(node.depth.saturating_sub(base_depth));
        match node.kind {
            NodeKind::Branch => println!("{}{}", indent, node.path.bold()),
            NodeKind::Leaf => {
                let value = index
                    .value_at(&node.path)
                    .map(|v| preview(v, config.preview_width))
                    .unwrap_or_default();
                println!("{}{}  {}", indent, node.path, value.dimmed());
            }
        }
    }
    Ok(())
}

fn collect_all(index: &TreeIndex<'_>, parent: &str, max_nodes: usize, out: &mut Vec<PathNode>) {
    for node in index.children_of(parent) {
        if out.len() >= max_nodes {
            return;
        }
        let path = node.path.clone();
        let descend = node.kind == NodeKind::Branch;
        out.push(node);
        if descend {
            collect_all(index, &path, max_nodes, out);
        }
    }
}
