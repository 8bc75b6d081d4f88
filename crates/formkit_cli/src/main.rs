//! formkit CLI
//!
//! Replay input scripts against form definitions and inspect the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod script;
mod session;

use config::FormDefinition;
use session::Session;

#[derive(Parser)]
#[command(name = "formkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "formkit form widget playground", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount a form, replay a script against it, and print the form state
    Run {
        /// Form definition (TOML)
        form: PathBuf,

        /// Input script, one command per line
        script: PathBuf,

        /// Validate every field before printing, as a submit would
        #[arg(long)]
        validate: bool,
    },

    /// Check a form definition for errors
    Check {
        /// Form definition (TOML)
        form: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the default level
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            form,
            script,
            validate,
        } => cmd_run(&form, &script, validate),
        Commands::Check { form } => cmd_check(&form),
    }
}

fn cmd_run(form: &Path, script_path: &Path, validate: bool) -> Result<()> {
    let definition = FormDefinition::load(form)?;
    let mut session = Session::new(&definition)
        .with_context(|| format!("Invalid form definition {}", form.display()))?;

    let text = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read {}", script_path.display()))?;
    let steps = script::parse(&text)
        .with_context(|| format!("Failed to parse {}", script_path.display()))?;

    info!("Replaying {} steps from {}", steps.len(), script_path.display());

    for step in &steps {
        session
            .apply(step)
            .with_context(|| format!("{}:{}", script_path.display(), step.line))?;
    }

    if validate {
        session.validate_all();
        if session.form().has_errors() {
            warn!("Form has validation errors");
        }
    }

    let report = serde_json::to_string_pretty(&session.report())
        .context("Failed to serialize form state")?;
    println!("{}", report);

    Ok(())
}

fn cmd_check(form: &Path) -> Result<()> {
    let definition = FormDefinition::load(form)?;
    definition
        .validate()
        .with_context(|| format!("Invalid form definition {}", form.display()))?;

    let comboboxes = definition.fields.iter().filter(|f| f.is_combobox()).count();
    info!(
        "{} is valid: {} fields ({} combobox, {} file)",
        form.display(),
        definition.fields.len(),
        comboboxes,
        definition.fields.len() - comboboxes
    );

    Ok(())
}
