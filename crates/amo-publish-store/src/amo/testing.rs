//! In-memory [`AddonsApi`] for tests

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::time::Instant;

use crate::error::{PublishError, Result};
use crate::traits::AddonsApi;
use crate::types::*;

use super::auth::Credential;

/// A recorded version endpoint call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateVersion {
        addon_id: String,
        body: CreateVersionBody,
    },
    CreateVersionWithSource {
        addon_id: String,
        upload: String,
        source: PathBuf,
        license: Option<String>,
    },
    PatchVersionSource {
        addon_id: String,
        version: String,
        source: PathBuf,
        license: Option<String>,
    },
}

#[derive(Default)]
struct FakeState {
    upload_error: Option<u16>,
    statuses: VecDeque<std::result::Result<UploadResponse, u16>>,
    default_status: Option<UploadResponse>,
    version_error: Option<u16>,
    uploads: Vec<Channel>,
    status_checks: Vec<Instant>,
    calls: Vec<ApiCall>,
}

/// Scripted remote: answers status checks from a queue and records calls
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next status check response
    pub fn push_status(&self, status: UploadResponse) {
        self.state.lock().unwrap().statuses.push_back(Ok(status));
    }

    /// Queue an error response for the next status check
    pub fn fail_status_with(&self, status: u16) {
        self.state.lock().unwrap().statuses.push_back(Err(status));
    }

    /// Response once the queue is empty
    pub fn set_default_status(&self, status: UploadResponse) {
        self.state.lock().unwrap().default_status = Some(status);
    }

    pub fn fail_upload_with(&self, status: u16) {
        self.state.lock().unwrap().upload_error = Some(status);
    }

    pub fn fail_versions_with(&self, status: u16) {
        self.state.lock().unwrap().version_error = Some(status);
    }

    /// Channels of created uploads
    pub fn uploads(&self) -> Vec<Channel> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// Virtual time of every status check
    pub fn status_checks(&self) -> Vec<Instant> {
        self.state.lock().unwrap().status_checks.clone()
    }

    /// Version endpoint calls in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.version_error {
            Some(status) => Err(http_error(status)),
            None => Ok(()),
        }
    }
}

fn http_error(status: u16) -> PublishError {
    PublishError::HttpStatus {
        status,
        body: "scripted failure".to_string(),
    }
}

#[async_trait::async_trait]
impl AddonsApi for FakeApi {
    async fn create_upload(
        &self,
        _package: &Path,
        channel: Channel,
        _credential: &Credential,
    ) -> Result<UploadResponse> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.upload_error {
            return Err(http_error(status));
        }
        state.uploads.push(channel);
        Ok(UploadResponse {
            uuid: "test-upload-uuid".to_string(),
            channel: Some(channel),
            processed: false,
            submitted: false,
            url: None,
            valid: false,
            validation: serde_json::json!({}),
            version: None,
        })
    }

    async fn get_upload(&self, _uuid: &str, _credential: &Credential) -> Result<UploadResponse> {
        let mut state = self.state.lock().unwrap();
        state.status_checks.push(Instant::now());
        match state.statuses.pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(status)) => Err(http_error(status)),
            None => state
                .default_status
                .clone()
                .ok_or_else(|| PublishError::Other("no scripted status left".to_string())),
        }
    }

    async fn create_version(
        &self,
        addon_id: &str,
        body: &CreateVersionBody,
        _credential: &Credential,
    ) -> Result<()> {
        self.record(ApiCall::CreateVersion {
            addon_id: addon_id.to_string(),
            body: body.clone(),
        })
    }

    async fn create_version_with_source(
        &self,
        addon_id: &str,
        upload: &str,
        source: &Path,
        license: Option<&str>,
        _credential: &Credential,
    ) -> Result<()> {
        self.record(ApiCall::CreateVersionWithSource {
            addon_id: addon_id.to_string(),
            upload: upload.to_string(),
            source: source.to_path_buf(),
            license: license.map(str::to_string),
        })
    }

    async fn patch_version_source(
        &self,
        addon_id: &str,
        version: &str,
        source: &Path,
        license: Option<&str>,
        _credential: &Credential,
    ) -> Result<()> {
        self.record(ApiCall::PatchVersionSource {
            addon_id: addon_id.to_string(),
            version: version.to_string(),
            source: source.to_path_buf(),
            license: license.map(str::to_string),
        })
    }
}
