//! Required `package.json` scripts.
//!
//! The app's frontend tooling is driven through npm scripts. A session cannot
//! run without `sync-assets`, `watch` and `serve`, checked in that order.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PreflightError, ValidationOutcome};

/// Scripts the app manifest must define, in check order.
pub const REQUIRED_SCRIPTS: [&str; 3] = ["sync-assets", "watch", "serve"];

/// Manifest file name, relative to the app source path.
pub const MANIFEST_FILE: &str = "package.json";

/// `<app_src_path>/package.json`: pure, no I/O.
pub fn manifest_path(app_src_path: &Path) -> PathBuf {
    app_src_path.join(MANIFEST_FILE)
}

/// Read the manifest under `app_src_path` and verify the required scripts.
pub async fn check_scripts(app_src_path: &Path) -> ValidationOutcome {
    let path = manifest_path(app_src_path);
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| PreflightError::MissingManifest {
            path: path.clone(),
            source,
        })?;
    check_manifest(&path, &contents)
}

/// Parse manifest text and verify the required scripts. `path` is only used
/// for messages.
pub fn check_manifest(path: &Path, contents: &str) -> ValidationOutcome {
    let json: Value =
        serde_json::from_str(contents).map_err(|e| PreflightError::InvalidManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !json.is_object() {
        return Err(PreflightError::InvalidManifest {
            path: path.to_path_buf(),
            reason: "top-level value is not an object".to_string(),
        });
    }

    match first_missing_script(&json) {
        Some(script) => Err(PreflightError::MissingScript {
            script: script.to_string(),
            manifest: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

/// The first entry of [`REQUIRED_SCRIPTS`] not defined in `manifest`.
///
/// A missing `scripts` object counts as no scripts at all.
pub fn first_missing_script(manifest: &Value) -> Option<&'static str> {
    let scripts = manifest.get("scripts").and_then(Value::as_object);
    REQUIRED_SCRIPTS.into_iter().find(|name| {
        !scripts
            .and_then(|scripts| scripts.get(*name))
            .is_some_and(is_truthy)
    })
}

// Empty strings, null, false and zero do not define a script.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
