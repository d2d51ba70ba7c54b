//! Remote API trait

use crate::amo::Credential;
use crate::error::Result;
use crate::types::*;
use std::path::Path;

/// Endpoints of the add-on distribution API used to publish a version
///
/// The version endpoints only report success or failure; their response
/// bodies are not needed afterwards.
///
/// [`crate::amo::AmoClient`] talks to addons.mozilla.org; the upload engine
/// and version publisher only depend on this trait.
#[async_trait::async_trait]
pub trait AddonsApi: Send + Sync {
    /// `POST /addons/upload/` with the package and channel
    async fn create_upload(
        &self,
        package: &Path,
        channel: Channel,
        credential: &Credential,
    ) -> Result<UploadResponse>;

    /// `GET /addons/upload/{uuid}/`
    async fn get_upload(&self, uuid: &str, credential: &Credential) -> Result<UploadResponse>;

    /// `POST /addons/addon/{addon}/versions/` with a JSON body
    async fn create_version(
        &self,
        addon_id: &str,
        body: &CreateVersionBody,
        credential: &Credential,
    ) -> Result<()>;

    /// `POST /addons/addon/{addon}/versions/` with upload and source as multipart
    async fn create_version_with_source(
        &self,
        addon_id: &str,
        upload: &str,
        source: &Path,
        license: Option<&str>,
        credential: &Credential,
    ) -> Result<()>;

    /// `PATCH /addons/addon/{addon}/versions/{version}/` attaching the source
    async fn patch_version_source(
        &self,
        addon_id: &str,
        version: &str,
        source: &Path,
        license: Option<&str>,
        credential: &Credential,
    ) -> Result<()>;
}
