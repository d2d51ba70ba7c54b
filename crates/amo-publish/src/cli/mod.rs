//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use amo_publish_core::{load_config, load_config_or_default, Config, PublishError};

use commands::{CheckCommand, PublishCommand};

/// amo-publish - Publish browser extensions to addons.mozilla.org
#[derive(Debug, Parser)]
#[command(name = "amo-publish")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search for amo-publish.toml)
    #[arg(long, global = true, env = "AMO_PUBLISH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload an add-on package and publish it as a new version
    Publish(PublishCommand),

    /// Validate inputs and read the package version without contacting the API
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir).map_err(|e| {
                PublishError::InvalidInput(format!(
                    "cannot change to directory {}: {e}",
                    dir.display()
                ))
            })?;
        }

        match self.command {
            Commands::Publish(ref cmd) => cmd.execute(&self),
            Commands::Check(ref cmd) => cmd.execute(&self),
        }
    }

    /// Configuration from `--config`, or the nearest config file, or defaults
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => load_config_or_default(&std::env::current_dir()?)?.0,
        };
        Ok(config)
    }
}
