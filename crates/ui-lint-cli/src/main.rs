//! ui-lint CLI tool.
//!
//! Usage:
//! ```bash
//! ui-lint check [OPTIONS] [PATH]
//! ui-lint heal [OPTIONS] [PATH]
//! ui-lint list-rules
//! ui-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ui_lint_core::RuleArea;

mod commands;
mod config_resolver;

/// Convention linter and healer for React/TSX projects
#[derive(Parser)]
#[command(name = "ui-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules, by name or code (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Apply automatic fixes
    Heal {
        /// Path to heal (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Apply at most this many fixes
        #[arg(long)]
        max_fix: Option<usize>,

        /// Only fix these areas (comma-separated, e.g. typing,directive)
        #[arg(long, value_delimiter = ',')]
        area: Vec<RuleArea>,

        /// Only fix this file, relative to PATH
        #[arg(long)]
        file: Option<PathBuf>,

        /// Leave barrel files untouched
        #[arg(long)]
        no_barrels: bool,

        /// Create test stubs for untested components
        #[arg(long)]
        scaffold_tests: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint and heal results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-issue compact format.
    Compact,
    /// Annotated source snippets.
    Fancy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            commands::check::run(&path, format, rules, exclude, &source)
        }
        Commands::Heal {
            path,
            dry_run,
            max_fix,
            area,
            file,
            no_barrels,
            scaffold_tests,
            format,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let args = commands::heal::HealArgs {
                dry_run,
                max_fix,
                areas: area,
                file,
                no_barrels,
                scaffold_tests,
                format,
            };
            commands::heal::run(&path, &args, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
