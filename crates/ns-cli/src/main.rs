//! nsroute command-line interface.
//!
//! Assembles a namespace from a TOML mount table and answers questions
//! about it.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `resolve` - Resolve one path to an entity
//! - `ls` - List the merged children of a path
//! - `mounts` - Show the mount points of the namespace
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! nsroute --config mounts.toml resolve /apps/sling/servlet.js
//! nsroute --config mounts.toml --format json ls /apps
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use nsroute_cli::commands;
use nsroute_core::cli::{ExitCode, OutputFormat};
use nsroute_tree::NamespaceTree;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// nsroute - inspect namespaces assembled from mounted providers.
#[derive(Parser, Debug)]
#[command(name = "nsroute")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Mount table to load (default: <config dir>/nsroute/mounts.toml)
    #[arg(short, long, global = true, env = "NSROUTE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a path to the entity that answers for it.
    ///
    /// Exits with 1 when nothing resolves.
    Resolve {
        /// Absolute namespace path
        path: String,
    },

    /// List the children of a path, merged across providers.
    Ls {
        /// Absolute namespace path
        #[arg(default_value = "/")]
        path: String,
    },

    /// Show every mount point of the namespace.
    Mounts,

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, cli.config, output_format)?;

    std::process::exit(exit_code.as_i32());
}

/// Sets up tracing on stderr.
///
/// `RUST_LOG` is honored unless `--verbose` forces debug output; without
/// either only warnings are shown so stdout stays clean for scripts.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads the namespace from `--config` or the default location.
fn open_tree(config: Option<PathBuf>) -> Result<NamespaceTree> {
    let path = config
        .or_else(commands::common::default_config_path)
        .context("no mount table given and no config directory available")?;
    commands::common::load_tree(&path)
}

/// Routes a command to its handler and returns the exit code.
fn execute_command(
    command: Commands,
    config: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Resolve { path } => {
            let tree = open_tree(config)?;
            commands::resolve::run(&tree, &path, output_format)
        }
        Commands::Ls { path } => {
            let tree = open_tree(config)?;
            commands::ls::run(&tree, &path, output_format)
        }
        Commands::Mounts => {
            let tree = open_tree(config)?;
            commands::mounts::run(&tree, output_format)
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
