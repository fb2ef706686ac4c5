//! Kiln CLI - Command-line interface for the Kiln asset pipeline

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{registry, request, validate, Context};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Deterministic procedural asset pipeline with a reuse-first registry", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of the global/project layers
    #[arg(long, global = true)]
    config: Option<String>,

    /// Registry directory (overrides config)
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a single asset
    Request {
        /// Asset family (sprite, ui, texture, icon, tileset, animation)
        family: String,

        /// Free-text description
        #[arg(long, short)]
        description: String,

        /// Category (e.g. button, character, terrain)
        #[arg(long)]
        category: Option<String>,

        /// Width in pixels
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Explicit attribute override (repeatable), e.g. --attr style=glass
        #[arg(long = "attr", value_parser = parse_key_value)]
        attributes: Vec<(String, String)>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Project scope
        #[arg(long)]
        project: Option<String>,
    },

    /// Run every need in a TOML file of [[need]] tables
    Batch {
        /// Path to the needs file
        file: String,
    },

    /// Generate the starter asset set for a kind of project
    Preset {
        /// Preset (role-playing, platformer, puzzle, line-of-business)
        archetype: String,

        /// Project scope the assets are filed under
        #[arg(long)]
        project: String,
    },

    /// Search the registry
    Search {
        /// Filter by family
        #[arg(long)]
        family: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by project
        #[arg(long)]
        project: Option<String>,

        /// Comma-separated tags; entries must carry all of them
        #[arg(long)]
        tags: Option<String>,

        /// Exact dimensions, e.g. 32x32
        #[arg(long)]
        dimensions: Option<String>,

        /// Include deprecated entries
        #[arg(long)]
        all: bool,
    },

    /// Show one registry entry
    Show {
        /// Entry identifier
        id: String,
    },

    /// Mark a registry entry as deprecated
    Deprecate {
        /// Entry identifier
        id: String,

        /// Why the entry should no longer be reused
        #[arg(long, default_value = "deprecated")]
        reason: String,
    },

    /// Run the quality checks on an existing file
    Validate {
        /// Path to the asset file (.png or .svg)
        path: String,

        /// Asset family, selects the size ceiling
        #[arg(long)]
        family: String,

        /// Expected width in pixels
        #[arg(long)]
        width: u32,

        /// Expected height in pixels
        #[arg(long)]
        height: u32,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn init_tracing(json: bool) {
    let filter = std::env::var("KILN_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let ctx = Context::new(cli.config.as_deref(), cli.registry.as_deref(), &cli.format)?;

    match cli.command {
        Commands::Request {
            family,
            description,
            category,
            width,
            height,
            attributes,
            tags,
            project,
        } => request::run_request(
            &ctx,
            request::RequestArgs {
                family,
                description,
                category,
                dimensions: width.zip(height),
                attributes,
                tags,
                project,
            },
        ),
        Commands::Batch { file } => request::run_batch(&ctx, &file),
        Commands::Preset { archetype, project } => {
            request::run_preset(&ctx, &archetype, &project)
        }
        Commands::Search {
            family,
            category,
            project,
            tags,
            dimensions,
            all,
        } => registry::run_search(
            &ctx,
            registry::SearchArgs {
                family,
                category,
                project,
                tags,
                dimensions,
                all,
            },
        ),
        Commands::Show { id } => registry::run_show(&ctx, &id),
        Commands::Deprecate { id, reason } => registry::run_deprecate(&ctx, &id, &reason),
        Commands::Validate {
            path,
            family,
            width,
            height,
        } => validate::run(&ctx, &path, &family, width, height),
    }
}
