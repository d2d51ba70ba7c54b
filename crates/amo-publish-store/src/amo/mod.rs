//! addons.mozilla.org integration
//!
//! This module provides:
//! - JWT credentials for the AMO API
//! - Package upload with validation polling
//! - Version creation, optionally with source code for review
//!
//! ## Usage
//!
//! ```ignore
//! use amo_publish_store::amo::{self, AmoClient, AmoConfig};
//!
//! let client = AmoClient::new(AmoConfig::default())?;
//! let credential = amo::issue_credential(&issuer, &secret)?;
//! let uuid = amo::submit_and_validate(&client, &xpi, &credential, false, &settings).await?;
//! amo::publish_version(&client, &request, &uuid, &credential, &xpi).await?;
//! ```

mod auth;
mod client;
mod manifest;
mod upload;
mod version;

#[cfg(test)]
mod testing;

pub use auth::{issue_credential, Claims, Credential, TOKEN_LIFETIME_SECS};
pub use client::{AmoClient, AmoConfig, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use manifest::{read_manifest_version, MANIFEST_FILE};
pub use upload::{submit_and_validate, wait_until_validated};
pub use version::{plan_version_update, publish_version, VersionUpdateOutcome, VersionUpdatePlan};
