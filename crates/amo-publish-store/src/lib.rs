//! addons.mozilla.org adapter for amo-publish
//!
//! This crate talks to the AMO add-on API to publish a browser extension:
//!
//! 1. sign a short-lived JWT ([`amo::issue_credential`])
//! 2. upload the package and wait for the validator ([`amo::submit_and_validate`])
//! 3. create the version, optionally with source code ([`amo::publish_version`])
//!
//! Every failure is a [`PublishError`] carrying the exit code the CLI
//! terminates with.
//!
//! ## Usage
//!
//! ```ignore
//! use amo_publish_store::{amo, AddonsApi, PollSettings, VersionUpdateRequest};
//!
//! let client = amo::AmoClient::new(amo::AmoConfig::default())?;
//! let credential = amo::issue_credential(&issuer, &secret)?;
//! let uuid = amo::submit_and_validate(&client, &xpi, &credential, false, &PollSettings::default()).await?;
//! ```

pub mod error;
pub mod traits;
pub mod types;

pub mod amo;

pub use error::{exit_code, ManifestError, PublishError, Result};
pub use traits::AddonsApi;
pub use types::*;
