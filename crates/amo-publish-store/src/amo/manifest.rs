//! Version number from a package's manifest.json

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{ManifestError, Result};

/// Name of the WebExtension manifest inside the package
pub const MANIFEST_FILE: &str = "manifest.json";

/// Read the `version` of `manifest.json` in the package at `path`
///
/// The result always starts with `v`, which is how the versions endpoint
/// addresses a version number.
pub fn read_manifest_version(path: &Path) -> Result<String> {
    let content = read_manifest(path)?;

    let manifest: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        debug!(manifest = %content, "manifest.json is not valid JSON");
        ManifestError::Malformed(e.to_string())
    })?;

    let object = manifest.as_object().ok_or_else(|| {
        debug!(manifest = %content, "manifest.json is not an object");
        ManifestError::Malformed("top-level value is not an object".to_string())
    })?;

    let version = match object.get("version").and_then(|v| v.as_str()) {
        Some(version) if !version.is_empty() => version,
        _ => {
            debug!(manifest = %manifest, "manifest.json has no usable version");
            return Err(ManifestError::MissingVersion.into());
        }
    };

    Ok(normalize_version(version))
}

fn read_manifest(path: &Path) -> std::result::Result<String, ManifestError> {
    let unreadable = |reason: String| ManifestError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| unreadable(e.to_string()))?;
    let mut entry = archive
        .by_name(MANIFEST_FILE)
        .map_err(|e| unreadable(e.to_string()))?;

    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| unreadable(e.to_string()))?;

    Ok(content)
}

fn normalize_version(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}
