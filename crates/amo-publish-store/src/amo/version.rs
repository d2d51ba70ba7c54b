//! Attach a validated upload to the add-on's version history
//!
//! The versions endpoint takes either structured metadata (JSON) or a source
//! archive (multipart) in one request, never both. When both are needed the
//! version is created first and the source attached afterwards, addressed by
//! the version number declared in the package manifest.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::error::{PublishError, Result};
use crate::traits::AddonsApi;
use crate::types::VersionUpdateRequest;

use super::auth::Credential;
use super::manifest::read_manifest_version;

/// How the version gets submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionUpdatePlan {
    /// JSON version create with all metadata, no source
    Create,

    /// One multipart version create carrying upload and source
    CreateWithSource { source: PathBuf },

    /// JSON version create, then multipart patch of the source
    CreateThenAttachSource { source: PathBuf },
}

impl VersionUpdatePlan {
    /// Short name for logs and summaries
    pub fn name(&self) -> &'static str {
        match self {
            VersionUpdatePlan::Create => "create",
            VersionUpdatePlan::CreateWithSource { .. } => "create-with-source",
            VersionUpdatePlan::CreateThenAttachSource { .. } => "create-then-attach-source",
        }
    }
}

/// Pick the submission shape for `request`
pub fn plan_version_update(request: &VersionUpdateRequest) -> VersionUpdatePlan {
    match (&request.source_file, request.has_metadata()) {
        (None, _) => VersionUpdatePlan::Create,
        (Some(source), false) => VersionUpdatePlan::CreateWithSource {
            source: source.clone(),
        },
        (Some(source), true) => VersionUpdatePlan::CreateThenAttachSource {
            source: source.clone(),
        },
    }
}

/// What a publish did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionUpdateOutcome {
    pub plan: VersionUpdatePlan,

    /// Manifest version, only read for [`VersionUpdatePlan::CreateThenAttachSource`]
    pub version: Option<String>,
}

/// Read the manifest version on the blocking pool
async fn manifest_version(package: &Path) -> Result<String> {
    let package = package.to_path_buf();
    tokio::task::spawn_blocking(move || read_manifest_version(&package))
        .await
        .map_err(|e| PublishError::Other(format!("manifest reader task failed: {e}")))?
}

/// Create the version for `upload_id`, attaching source code if requested
#[instrument(skip_all, fields(addon = %request.addon_id, upload = %upload_id))]
pub async fn publish_version<A: AddonsApi + ?Sized>(
    api: &A,
    request: &VersionUpdateRequest,
    upload_id: &str,
    credential: &Credential,
    package: &Path,
) -> Result<VersionUpdateOutcome> {
    let plan = plan_version_update(request);
    info!(plan = plan.name(), "Start to update add-on.");

    let license = request.license.as_deref();
    let version = match &plan {
        VersionUpdatePlan::Create => {
            api.create_version(&request.addon_id, &request.version_body(upload_id), credential)
                .await?;
            None
        }
        VersionUpdatePlan::CreateWithSource { source } => {
            api.create_version_with_source(
                &request.addon_id,
                upload_id,
                source,
                license,
                credential,
            )
            .await?;
            None
        }
        VersionUpdatePlan::CreateThenAttachSource { source } => {
            // Fail on a bad manifest before anything is created remotely
            let version = manifest_version(package).await?;
            api.create_version(&request.addon_id, &request.version_body(upload_id), credential)
                .await?;
            api.patch_version_source(&request.addon_id, &version, source, license, credential)
                .await?;
            Some(version)
        }
    };

    info!("Add-on updated.");
    Ok(VersionUpdateOutcome { plan, version })
}
