//! Check command - validate inputs offline

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use amo_publish_store::amo::read_manifest_version;
use amo_publish_store::Compatibility;

use super::inputs::PackageArgs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Validate inputs and read the package version without contacting the API
#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub package: PackageArgs,
}

impl CheckCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(xpi_path = %self.package.xpi_path, "executing check command");

        let config = cli.load_config()?;
        let inputs = self.package.resolve()?;
        let version = read_manifest_version(&inputs.package)?;

        let locales: Vec<&str> = inputs
            .release_notes
            .iter()
            .flat_map(|notes| notes.keys().map(String::as_str))
            .collect();
        let apps: Vec<&str> = match &inputs.compatibility {
            Some(Compatibility::Apps(apps)) => apps.iter().map(String::as_str).collect(),
            Some(Compatibility::Ranges(ranges)) => ranges.keys().map(String::as_str).collect(),
            None => Vec::new(),
        };

        match cli.format {
            OutputFormat::Json => {
                let report = json!({
                    "package": &inputs.package,
                    "version": version,
                    "source_file": &inputs.source_file,
                    "release_notes_locales": locales,
                    "compatibility": apps,
                    "api_url": config.api.base_url,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Package"));
                    println!(
                        "{}",
                        output::key_value(
                            "File",
                            &output::path_style()
                                .apply_to(inputs.package.display())
                                .to_string()
                        )
                    );
                    println!(
                        "{}",
                        output::key_value(
                            "Version",
                            &output::version_style().apply_to(&version).to_string()
                        )
                    );
                    if let Some(source) = &inputs.source_file {
                        println!(
                            "{}",
                            output::key_value("Source", &source.display().to_string())
                        );
                    }
                    if !locales.is_empty() {
                        println!("{}", output::key_value("Release notes", &locales.join(", ")));
                    }
                    if !apps.is_empty() {
                        println!("{}", output::key_value("Compatibility", &apps.join(", ")));
                    }
                    println!();
                    println!("{} Ready to publish", style("✓").green().bold());
                }
            }
        }

        Ok(())
    }
}
