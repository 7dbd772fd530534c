//! model-type-validator CLI
//!
//! Validates the type descriptors of a running management server, or of a
//! saved description dump, and prints every failure found.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;
use model_type_validator::prelude::*;
use std::path::PathBuf;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "model-type-validator", version)]
#[command(about = "Checks value-type consistency of management model descriptions", long_about = None)]
struct Cli {
    /// Resource to start from, e.g. /subsystem=messaging.
    #[arg(long, default_value = "/")]
    address: String,

    /// Read the whole subtree at once (eager) or one resource at a time (lazy).
    #[arg(long, value_enum)]
    mode: Option<TraversalMode>,

    /// Management endpoint URL.
    #[arg(long)]
    url: Option<String>,

    #[arg(long, requires = "password")]
    user: Option<String>,

    #[arg(long, requires = "user")]
    password: Option<String>,

    /// Validate a recursive description dump instead of a live server.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Address the dump was taken at. Defaults to --address.
    #[arg(long, requires = "snapshot")]
    snapshot_root: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to do with declared children that have no description.
    #[arg(long, value_enum)]
    missing_child: Option<MissingChildPolicy>,

    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let address: Address = cli
        .address
        .parse()
        .with_context(|| format!("invalid --address {}", cli.address))?;
    let validator = DescriptionValidator::new(config.validation.clone());

    let report = match &cli.snapshot {
        Some(path) => {
            let root = match &cli.snapshot_root {
                Some(root) => root
                    .parse()
                    .with_context(|| format!("invalid --snapshot-root {}", root))?,
                None => address.clone(),
            };
            let client = SnapshotClient::from_file(path, root)
                .with_context(|| format!("cannot load snapshot {}", path.display()))?;
            info!("validating {} from {}", address, path.display());
            validator.run(&client, &address)?
        }
        None => {
            info!("validating {} at {}", address, config.controller.url);
            model_type_validator::validate_server(&config, &cli.address)?
        }
    };

    info!("{}", report.summary());
    match cli.format {
        OutputFormat::Text => print_failures(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Configuration file (if any) with command line overrides applied.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.validation.mode = mode;
    }
    if let Some(policy) = cli.missing_child {
        config.validation.missing_child = policy;
    }
    if let Some(max_depth) = cli.max_depth {
        config.validation.max_depth = max_depth;
    }
    if let Some(url) = &cli.url {
        config.controller.url = url.clone();
    }
    if let (Some(user), Some(password)) = (&cli.user, &cli.password) {
        config.controller.username = Some(user.clone());
        config.controller.password = Some(password.clone());
    }

    config.check()?;
    Ok(config)
}

fn print_failures(report: &ValidationReport) {
    if report.failures.is_empty() {
        println!("OK");
        return;
    }
    for failure in &report.failures {
        println!("{}", failure);
    }
}
