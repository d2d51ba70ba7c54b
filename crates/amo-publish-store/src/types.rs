//! Common types for the AMO adapter

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Release notes keyed by locale code (e.g. "en-US")
pub type ReleaseNotes = BTreeMap<String, String>;

/// Version channel, which determines visibility on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Public listing on addons.mozilla.org
    Listed,
    /// Signed for self-distribution only
    Unlisted,
}

impl Channel {
    /// Self-hosted add-ons go to the unlisted channel
    pub fn from_self_hosted(self_hosted: bool) -> Self {
        if self_hosted {
            Channel::Unlisted
        } else {
            Channel::Listed
        }
    }

    /// Value sent in the `channel` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Listed => "listed",
            Channel::Unlisted => "unlisted",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload detail as returned by `/addons/upload/`
///
/// Only `uuid` is required; the service fills in the rest as validation
/// progresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// The upload id
    pub uuid: String,

    /// Channel the upload was created for
    #[serde(default)]
    pub channel: Option<Channel>,

    /// Whether the validator has finished
    #[serde(default)]
    pub processed: bool,

    /// Whether the upload was already submitted as a version
    #[serde(default)]
    pub submitted: bool,

    /// URL to check the status of this upload
    #[serde(default)]
    pub url: Option<String>,

    /// Whether the package passed validation
    #[serde(default)]
    pub valid: bool,

    /// Validation results blob, shape defined by the service
    #[serde(default)]
    pub validation: serde_json::Value,

    /// Version number parsed from the manifest by the service
    #[serde(default)]
    pub version: Option<String>,
}

/// Minimum/maximum application version for a compatibility entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// Application compatibility of a new version
///
/// See <https://mozilla.github.io/addons-server/topics/api/addons.html#version-compatibility-examples>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Compatibility {
    /// Application names, default version ranges
    Apps(Vec<String>),
    /// Application name to explicit range
    Ranges(BTreeMap<String, VersionRange>),
}

/// What to attach to the add-on once an upload validated
#[derive(Debug, Clone, Default)]
pub struct VersionUpdateRequest {
    /// Add-on GUID or slug
    pub addon_id: String,

    /// License slug (e.g. "MPL-2.0")
    pub license: Option<String>,

    /// Notes for the reviewers
    pub approval_notes: Option<String>,

    /// Release notes per locale
    pub release_notes: Option<ReleaseNotes>,

    /// Application compatibility
    pub compatibility: Option<Compatibility>,

    /// Source code archive for review
    pub source_file: Option<PathBuf>,
}

impl VersionUpdateRequest {
    /// Whether any field exists that only the JSON version body can carry
    pub fn has_metadata(&self) -> bool {
        self.approval_notes.is_some()
            || self.release_notes.is_some()
            || self.compatibility.is_some()
    }

    /// JSON body for version creation referencing `upload`
    pub fn version_body(&self, upload: &str) -> CreateVersionBody {
        CreateVersionBody {
            upload: upload.to_string(),
            license: self.license.clone(),
            approval_notes: self.approval_notes.clone(),
            release_notes: self.release_notes.clone(),
            compatibility: self.compatibility.clone(),
        }
    }
}

/// Body of `POST /addons/addon/{id}/versions/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateVersionBody {
    pub upload: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<ReleaseNotes>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<Compatibility>,
}

/// Polling cadence for upload validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Fixed wait before every status check
    pub interval: Duration,

    /// Ceiling measured from the start of polling
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(10 * 60),
        }
    }
}

/// Summary of a successful publish run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSummary {
    /// Upload id consumed by the version
    pub upload_uuid: String,

    /// Channel the upload went to
    pub channel: Channel,

    /// Which version submission shape was used
    pub action: String,

    /// Version number read from the manifest, when it was needed
    pub version: Option<String>,
}
