//! addons.mozilla.org API v5 client
//!
//! Implements [`AddonsApi`] over HTTP with reqwest. Package and source
//! files are streamed from disk into multipart bodies.

use crate::error::{truncate_detail, PublishError, Result};
use crate::traits::AddonsApi;
use crate::types::*;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::auth::Credential;

/// Public AMO API root
pub const DEFAULT_API_BASE_URL: &str = "https://addons.mozilla.org/api/v5";

/// Per-request timeout; generous so large packages can finish uploading
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// AMO client configuration
#[derive(Debug, Clone)]
pub struct AmoConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Timeout applied to each request
    pub request_timeout: Duration,
}

impl Default for AmoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// HTTP client for the AMO add-on API
pub struct AmoClient {
    config: AmoConfig,
    client: Client,
}

impl AmoClient {
    /// Create a new AMO client
    pub fn new(mut config: AmoConfig) -> Result<Self> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("amo-publish/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    /// API root this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn upload_url(&self) -> String {
        format!("{}/addons/upload/", self.config.base_url)
    }

    fn upload_detail_url(&self, uuid: &str) -> String {
        format!("{}/addons/upload/{}/", self.config.base_url, uuid)
    }

    fn versions_url(&self, addon_id: &str) -> String {
        format!("{}/addons/addon/{}/versions/", self.config.base_url, addon_id)
    }

    fn version_url(&self, addon_id: &str, version: &str) -> String {
        format!(
            "{}/addons/addon/{}/versions/{}/",
            self.config.base_url, addon_id, version
        )
    }

    /// Send an authenticated request and fail on error statuses
    async fn execute(&self, request: RequestBuilder, credential: &Credential) -> Result<Response> {
        let response = request
            .header("Authorization", credential.authorization())
            .send()
            .await?;

        check_status(response).await
    }

    /// Send an authenticated request and decode the JSON response
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<T> {
        let response = self.execute(request, credential).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            debug!(status, error = %e, "undecodable response body");
            PublishError::UnexpectedResponse { status, body }
        })
    }

    /// Send an authenticated request whose response body is not needed
    async fn send_discarding_body(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<()> {
        let response = self.execute(request, credential).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, body = %truncate_detail(&body), "response");
        Ok(())
    }
}

/// Map a non-2xx response to [`PublishError::HttpStatus`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "API error response");
    Err(PublishError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

/// Open `path` as a streamed multipart file part
async fn file_part(path: &Path) -> Result<Part> {
    let to_error = |source| PublishError::PackageFile {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::open(path).await.map_err(to_error)?;
    let length = file.metadata().await.map_err(to_error)?.len();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(Part::stream_with_length(file, length).file_name(file_name))
}

#[async_trait::async_trait]
impl AddonsApi for AmoClient {
    #[instrument(skip(self, credential), fields(package = %package.display()))]
    async fn create_upload(
        &self,
        package: &Path,
        channel: Channel,
        credential: &Credential,
    ) -> Result<UploadResponse> {
        info!("Start to upload xpi file to firefox addons server.");

        let form = Form::new()
            .part("upload", file_part(package).await?)
            .text("channel", channel.as_str());

        let upload: UploadResponse = self
            .send(self.client.post(self.upload_url()).multipart(form), credential)
            .await?;

        info!(uuid = %upload.uuid, "xpi file uploaded.");
        Ok(upload)
    }

    #[instrument(skip(self, credential))]
    async fn get_upload(&self, uuid: &str, credential: &Credential) -> Result<UploadResponse> {
        self.send(self.client.get(self.upload_detail_url(uuid)), credential)
            .await
    }

    #[instrument(skip(self, body, credential))]
    async fn create_version(
        &self,
        addon_id: &str,
        body: &CreateVersionBody,
        credential: &Credential,
    ) -> Result<()> {
        info!("Start to create a version.");
        debug!(body = %serde_json::to_string(body)?, "version body");

        self.send_discarding_body(
            self.client.post(self.versions_url(addon_id)).json(body),
            credential,
        )
        .await?;

        info!("Version created.");
        Ok(())
    }

    #[instrument(skip(self, credential), fields(source = %source.display()))]
    async fn create_version_with_source(
        &self,
        addon_id: &str,
        upload: &str,
        source: &Path,
        license: Option<&str>,
        credential: &Credential,
    ) -> Result<()> {
        info!("Start to create a version source.");

        let mut form = Form::new()
            .text("upload", upload.to_string())
            .part("source", file_part(source).await?);
        if let Some(license) = license {
            form = form.text("license", license.to_string());
        }

        self.send_discarding_body(
            self.client.post(self.versions_url(addon_id)).multipart(form),
            credential,
        )
        .await?;

        info!("Version source created.");
        Ok(())
    }

    #[instrument(skip(self, credential), fields(source = %source.display()))]
    async fn patch_version_source(
        &self,
        addon_id: &str,
        version: &str,
        source: &Path,
        license: Option<&str>,
        credential: &Credential,
    ) -> Result<()> {
        info!("Start to patch a version source.");

        let mut form = Form::new().part("source", file_part(source).await?);
        if let Some(license) = license {
            form = form.text("license", license.to_string());
        }

        self.send_discarding_body(
            self.client
                .patch(self.version_url(addon_id, version))
                .multipart(form),
            credential,
        )
        .await?;

        info!("Version source patched.");
        Ok(())
    }
}
