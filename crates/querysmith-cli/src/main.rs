//! # Querysmith CLI
//!
//! Command-line interface for the Querysmith search query builder.
//!
//! The query is saved between invocations, so one-shot commands build it up
//! step by step and `show` or `open` use the result.
//!
//! ## Commands
//!
//! - `querysmith add-op <id> [value]` - Append an operator
//! - `querysmith add-text [value]` - Append free text
//! - `querysmith preset <id>` - Apply a search preset
//! - `querysmith generate <prompt>` - Build the query from a description
//! - `querysmith show` - Print the parts, query and search URL
//! - `querysmith open` - Run the search in the browser
//! - `querysmith interactive` - Start the interactive builder
//! - `querysmith clear` - Forget the saved query and preferences
//!
//! ## Example Usage
//!
//! ```bash
//! querysmith add-text cats
//! querysmith add-op site example.com
//! querysmith show
//!
//! # Let the model do it
//! export OPENROUTER_API_KEY=...
//! querysmith generate "pdf reports about climate from universities"
//! ```

mod app;
mod commands;
mod tui;

use clap::{Parser, Subcommand};
use querysmith_core::{Language, OperatorCategory, Theme};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Querysmith - Structured search query builder
#[derive(Parser)]
#[command(name = "querysmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available operators
    Operators {
        /// Only show one category (basic, content, location, time, advanced)
        #[arg(short = 'C', long)]
        category: Option<OperatorCategory>,
    },

    /// List the search presets
    Presets,

    /// Show the current parts, query and search URL
    Show {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Append an operator, optionally with its value
    AddOp {
        /// Operator id (see `querysmith operators`)
        id: String,

        /// Value for the operator
        value: Option<String>,
    },

    /// Append a text part
    AddText {
        /// Text to add (empty slot if omitted)
        value: Option<String>,
    },

    /// Set the value of a part
    Set {
        /// Part position (1-based) or id
        part: String,

        /// New value
        value: String,
    },

    /// Remove a part
    #[command(alias = "rm")]
    Remove {
        /// Part position (1-based) or id
        part: String,
    },

    /// Apply a search preset, or clear it
    Preset {
        /// Preset id (see `querysmith presets`)
        #[arg(required_unless_present = "clear")]
        id: Option<String>,

        /// Remove the active preset
        #[arg(long, conflicts_with = "id")]
        clear: bool,
    },

    /// Start over with an empty query
    Reset,

    /// Build the query from a natural-language description
    #[command(alias = "gen")]
    Generate {
        /// What you are looking for
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the models offered by the generation service
    Models,

    /// Open the current query in the browser
    Open,

    /// Set the color theme (toggles when no value is given)
    Theme { value: Option<Theme> },

    /// Set the language (toggles when no value is given)
    Language { value: Option<Language> },

    /// Start the interactive builder
    #[command(alias = "i")]
    Interactive,

    /// Delete the saved query and preferences
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => querysmith_core::Config::load_from(path)?,
        None => querysmith_core::Config::load()?,
    };

    // Setup logging; the interactive builder owns the terminal, so it stays
    // silent unless RUST_LOG asks otherwise
    let log_level = if cli.quiet {
        "error".to_string()
    } else if matches!(cli.command, Commands::Interactive) {
        "off".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Execute command
    match cli.command {
        Commands::Operators { category } => commands::catalog::operators(config, category),
        Commands::Presets => commands::catalog::presets(config),
        Commands::Show { output } => commands::show::run(config, output),
        Commands::AddOp { id, value } => commands::edit::add_operator(config, &id, value.as_deref()),
        Commands::AddText { value } => commands::edit::add_text(config, value.as_deref()),
        Commands::Set { part, value } => commands::edit::set(config, &part, &value),
        Commands::Remove { part } => commands::edit::remove(config, &part),
        Commands::Preset { id, clear } => {
            commands::edit::preset(config, if clear { None } else { id.as_deref() })
        }
        Commands::Reset => commands::edit::reset(config),
        Commands::Generate { prompt, model } => {
            commands::generate::run(config, &prompt.join(" "), model)
        }
        Commands::Models => commands::generate::models(config),
        Commands::Open => commands::open::run(config),
        Commands::Theme { value } => commands::prefs::theme(config, value),
        Commands::Language { value } => commands::prefs::language(config, value),
        Commands::Interactive => tui::run(config),
        Commands::Clear { yes } => commands::clear::run(config, yes),
    }
}
