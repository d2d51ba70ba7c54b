//! Publish command - upload, validate and create the version

use clap::Args;
use console::style;
use tracing::info;

use amo_publish_core::{validate_config, Config, PublishError};
use amo_publish_store::amo::{self, AmoClient};
use amo_publish_store::{Channel, PublishSummary, VersionUpdateRequest};

use super::inputs::{non_empty, PackageArgs, PackageInputs};
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Upload an add-on package and publish it as a new version
#[derive(Debug, Args)]
pub struct PublishCommand {
    /// Add-on GUID or slug
    #[arg(long, env = "AMO_ADDON_GUID")]
    pub addon_guid: String,

    /// JWT issuer (API key)
    #[arg(long, env = "AMO_JWT_ISSUER")]
    pub jwt_issuer: String,

    /// JWT secret (API secret)
    #[arg(long, env = "AMO_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[command(flatten)]
    pub package: PackageArgs,

    /// Distribute the add-on yourself (unlisted channel)
    #[arg(long)]
    pub self_hosted: bool,

    /// License slug, e.g. MPL-2.0
    #[arg(long, env = "AMO_LICENSE")]
    pub license: Option<String>,

    /// Notes for the reviewers
    #[arg(long, env = "AMO_APPROVAL_NOTES")]
    pub approval_notes: Option<String>,

    /// API root URL (overrides the config file)
    #[arg(long, env = "AMO_API_URL")]
    pub api_url: Option<String>,

    /// Seconds between validation checks (overrides the config file)
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Seconds to wait for validation (overrides the config file)
    #[arg(long)]
    pub poll_timeout: Option<u64>,
}

impl PublishCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(addon = %self.addon_guid, self_hosted = self.self_hosted, "executing publish command");

        let config = self.effective_config(cli.load_config()?)?;
        let inputs = self.package.resolve()?;
        let request = self.version_request(&inputs)?;

        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(self.run(cli, &config, &inputs, &request))?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!(
                        "Published {} to addons.mozilla.org",
                        style(&self.addon_guid).bold()
                    ));
                    println!("{}", output::key_value("Upload", &summary.upload_uuid));
                    println!("{}", output::key_value("Channel", summary.channel.as_str()));
                    println!("{}", output::key_value("Action", &summary.action));
                    if let Some(version) = &summary.version {
                        println!(
                            "{}",
                            output::key_value(
                                "Version",
                                &output::version_style().apply_to(version).to_string()
                            )
                        );
                    }
                }
            }
        }

        Ok(())
    }

    async fn run(
        &self,
        cli: &Cli,
        config: &Config,
        inputs: &PackageInputs,
        request: &VersionUpdateRequest,
    ) -> Result<PublishSummary, PublishError> {
        let client = AmoClient::new(config.api.client_config())?;
        let credential = amo::issue_credential(&self.jwt_issuer, &self.jwt_secret)?;
        let channel = Channel::from_self_hosted(self.self_hosted);

        if !cli.quiet && cli.format == OutputFormat::Text {
            output::info(&format!(
                "Uploading {} to the {} channel",
                output::path_style().apply_to(inputs.package.display()),
                channel
            ));
        }

        let upload_uuid = amo::submit_and_validate(
            &client,
            &inputs.package,
            &credential,
            self.self_hosted,
            &config.polling.settings(),
        )
        .await?;

        let outcome =
            amo::publish_version(&client, request, &upload_uuid, &credential, &inputs.package)
                .await?;

        Ok(PublishSummary {
            upload_uuid,
            channel,
            action: outcome.plan.name().to_string(),
            version: outcome.version,
        })
    }

    /// Apply command line overrides on top of the loaded configuration
    fn effective_config(&self, mut config: Config) -> Result<Config, PublishError> {
        if let Some(url) = non_empty(&self.api_url) {
            config.api.base_url = url.to_string();
        }
        if let Some(interval) = self.poll_interval {
            config.polling.interval_secs = interval;
        }
        if let Some(timeout) = self.poll_timeout {
            config.polling.timeout_secs = timeout;
        }
        validate_config(&config)?;
        Ok(config)
    }

    fn version_request(&self, inputs: &PackageInputs) -> Result<VersionUpdateRequest, PublishError> {
        let addon_id = self.addon_guid.trim();
        if addon_id.is_empty() {
            return Err(PublishError::InvalidInput(
                "addon GUID must not be empty".to_string(),
            ));
        }

        Ok(VersionUpdateRequest {
            addon_id: addon_id.to_string(),
            license: non_empty(&self.license).map(str::to_string),
            approval_notes: non_empty(&self.approval_notes).map(str::to_string),
            release_notes: inputs.release_notes.clone(),
            compatibility: inputs.compatibility.clone(),
            source_file: inputs.source_file.clone(),
        })
    }
}
