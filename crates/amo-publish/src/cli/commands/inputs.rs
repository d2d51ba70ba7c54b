//! Package arguments shared by `publish` and `check`

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use amo_publish_core::{
    parse_compatibility, parse_release_notes, require_package_extension,
    require_source_extension, resolve_file, Result,
};
use amo_publish_store::{Compatibility, ReleaseNotes};

/// Package and version metadata arguments
#[derive(Debug, Clone, Args)]
pub struct PackageArgs {
    /// Path or glob of the add-on package (.zip, .xpi, .crx)
    #[arg(long, env = "AMO_XPI_PATH")]
    pub xpi_path: String,

    /// Release notes as a JSON object of locale to text, e.g. '{"en-US": "Fixes"}'
    #[arg(long, env = "AMO_RELEASE_NOTES")]
    pub release_notes: Option<String>,

    /// Compatible applications as a JSON array or object of version ranges
    #[arg(long, env = "AMO_COMPATIBILITY")]
    pub compatibility: Option<String>,

    /// Path or glob of the source archive (.zip, .tar.gz, .tgz, .tar.bz2)
    #[arg(long, env = "AMO_SOURCE_FILE_PATH")]
    pub source_file_path: Option<String>,
}

/// Validated package arguments
#[derive(Debug, Clone)]
pub struct PackageInputs {
    pub package: PathBuf,
    pub release_notes: Option<ReleaseNotes>,
    pub compatibility: Option<Compatibility>,
    pub source_file: Option<PathBuf>,
}

impl PackageArgs {
    /// Parse and resolve everything offline, in a fixed order
    pub fn resolve(&self) -> Result<PackageInputs> {
        let release_notes = match non_empty(&self.release_notes) {
            Some(raw) => parse_release_notes(raw)?,
            None => None,
        };

        let compatibility = match non_empty(&self.compatibility) {
            Some(raw) => parse_compatibility(raw)?,
            None => None,
        };

        let source_file = match non_empty(&self.source_file_path) {
            Some(pattern) => {
                let path = resolve_file(pattern)?;
                require_source_extension(&path)?;
                Some(path)
            }
            None => None,
        };

        let package = resolve_file(&self.xpi_path)?;
        require_package_extension(&package)?;

        debug!(
            package = %package.display(),
            source = ?source_file,
            "resolved package inputs"
        );

        Ok(PackageInputs {
            package,
            release_notes,
            compatibility,
            source_file,
        })
    }
}

/// Treat blank flag values like absent ones
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
