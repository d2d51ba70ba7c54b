//! Caller input parsing and file resolution
//!
//! Everything here runs before any network call, so a bad flag never leaves
//! an orphaned upload behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use amo_publish_store::{Compatibility, ReleaseNotes, VersionRange};

use crate::error::{PublishError, Result};

/// Accepted add-on package extensions
pub const PACKAGE_EXTENSIONS: &[&str] = &[".zip", ".xpi", ".crx"];

/// Accepted source archive extensions
pub const SOURCE_EXTENSIONS: &[&str] = &[".zip", ".tar.gz", ".tgz", ".tar.bz2"];

fn invalid(message: impl Into<String>) -> PublishError {
    PublishError::InvalidInput(message.into())
}

fn parse_object(input: &str, what: &str) -> Result<Option<Map<String, Value>>> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| invalid(format!("{what} is not valid JSON: {e}")))?;
    match value {
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(invalid(format!("{what} must be a JSON object, got {other}"))),
    }
}

/// Parse the release notes flag: a JSON object of locale to text
pub fn parse_release_notes(input: &str) -> Result<Option<ReleaseNotes>> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let Some(map) = parse_object(input, "release notes")? else {
        return Ok(None);
    };

    let mut notes = ReleaseNotes::new();
    for (locale, text) in map {
        match text {
            Value::String(text) => {
                notes.insert(locale, text);
            }
            other => {
                return Err(invalid(format!(
                    "release notes for '{locale}' must be a string, got {other}"
                )))
            }
        }
    }

    debug!(locales = notes.len(), "parsed release notes");
    Ok(Some(notes))
}

/// Parse the compatibility flag
///
/// Either a list of application names (`["firefox", "android"]`) or an
/// object mapping application names to `{"min": .., "max": ..}`.
pub fn parse_compatibility(input: &str) -> Result<Option<Compatibility>> {
    if input.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(input)
        .map_err(|e| invalid(format!("compatibility is not valid JSON: {e}")))?;

    match value {
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Array(items) => {
            let apps = items
                .into_iter()
                .map(|item| match item {
                    Value::String(app) if !app.is_empty() => Ok(app),
                    other => Err(invalid(format!(
                        "compatibility entries must be application names, got {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Compatibility::Apps(apps)))
        }
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => {
            let mut ranges = BTreeMap::new();
            for (app, range) in map {
                ranges.insert(app.clone(), parse_range(&app, range)?);
            }
            Ok(Some(Compatibility::Ranges(ranges)))
        }
        other => Err(invalid(format!(
            "compatibility must be a JSON array or object, got {other}"
        ))),
    }
}

fn parse_range(app: &str, value: Value) -> Result<VersionRange> {
    let Value::Object(fields) = value else {
        return Err(invalid(format!(
            "compatibility for '{app}' must be an object with min/max"
        )));
    };

    let mut range = VersionRange::default();
    for (key, bound) in fields {
        let bound = match bound {
            Value::String(bound) => bound,
            other => {
                return Err(invalid(format!(
                    "compatibility {key} for '{app}' must be a string, got {other}"
                )))
            }
        };
        match key.as_str() {
            "min" => range.min = Some(bound),
            "max" => range.max = Some(bound),
            _ => {
                return Err(invalid(format!(
                    "unknown compatibility key '{key}' for '{app}'"
                )))
            }
        }
    }
    Ok(range)
}

/// Resolve a path or glob pattern to exactly one regular file
pub fn resolve_file(pattern: &str) -> Result<PathBuf> {
    let entries =
        glob::glob(pattern).map_err(|e| invalid(format!("invalid pattern '{pattern}': {e}")))?;

    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| invalid(format!("cannot read '{pattern}': {e}")))?;
        matches.push(path);
    }

    match matches.as_slice() {
        [] => Err(invalid(format!("no file matches '{pattern}'"))),
        [path] if path.is_file() => {
            debug!(pattern, path = %path.display(), "resolved file");
            Ok(path.clone())
        }
        [path] => Err(invalid(format!("'{}' is not a regular file", path.display()))),
        _ => Err(invalid(format!(
            "'{pattern}' matches {} files, expected exactly one",
            matches.len()
        ))),
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    extensions.iter().any(|ext| name.ends_with(ext))
}

/// Require an add-on package extension
pub fn require_package_extension(path: &Path) -> Result<()> {
    if has_extension(path, PACKAGE_EXTENSIONS) {
        Ok(())
    } else {
        Err(invalid(format!(
            "package '{}' must end with one of {}",
            path.display(),
            PACKAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Require a source archive extension
pub fn require_source_extension(path: &Path) -> Result<()> {
    if has_extension(path, SOURCE_EXTENSIONS) {
        Ok(())
    } else {
        Err(invalid(format!(
            "source archive '{}' must end with one of {}",
            path.display(),
            SOURCE_EXTENSIONS.join(", ")
        )))
    }
}
