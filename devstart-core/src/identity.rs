//! App identity: where the name comes from, what it must look like, and the
//! id derived from it.
//!
//! # Project metadata
//!
//! ```text
//! <project>/
//!   arapp.json     { "environments": { "default": { "appName": "myapp.aragonpm.eth" } } }
//! ```
//!
//! Only `environments.default.appName` is read. Other environments are
//! ignored during development.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::IdentityError;
use crate::types::{AppId, EnsName, ProjectIdentity};

/// Project metadata file name, relative to the project root.
pub const ARAPP_FILE: &str = "arapp.json";

/// Registry every development name must live under.
pub const DEV_REGISTRY_SUFFIX: &str = "aragonpm.eth";

/// `<project>/arapp.json`: pure, no I/O.
pub fn arapp_path(project_root: &Path) -> PathBuf {
    project_root.join(ARAPP_FILE)
}

/// Extract `environments.default.appName` from the contents of `arapp.json`.
///
/// `path` is only used for error context.
pub fn ens_name_from_arapp(path: &Path, contents: &str) -> Result<EnsName, IdentityError> {
    let json: serde_json::Value =
        serde_json::from_str(contents).map_err(|source| IdentityError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    json.pointer("/environments/default/appName")
        .and_then(|v| v.as_str())
        .map(EnsName::from)
        .ok_or_else(|| IdentityError::MissingAppName {
            path: path.to_path_buf(),
        })
}

/// Short app name: the first label of the ENS name (`myapp` for `myapp.aragonpm.eth`).
pub fn app_name(ens: &EnsName) -> String {
    ens.labels().next().unwrap_or_default().to_string()
}

/// Derive the app id with ENS-style namehash over SHA-256.
///
/// `node = 0^32; for label in reversed(labels): node = H(node || H(label))`
pub fn app_id(ens: &EnsName) -> AppId {
    let mut node = [0u8; 32];
    for label in ens.labels().rev() {
        let label_hash = Sha256::digest(label.as_bytes());
        let mut hasher = Sha256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node.copy_from_slice(&hasher.finalize());
    }
    AppId(format!("0x{}", hex::encode(node)))
}

/// Build the full identity for an ENS name.
pub fn identity_for(app_name: String, ens: EnsName) -> ProjectIdentity {
    let id = app_id(&ens);
    ProjectIdentity {
        name: app_name,
        ens_like_name: ens,
        id,
    }
}

/// True only for `<label>.aragonpm.eth` where `label` is `[a-z0-9-]+`.
///
/// Non-development environments are not restricted; this rule applies only to
/// the local session.
pub fn is_valid_dev_ens_name(name: &str) -> bool {
    let Some(label) = name
        .strip_suffix(DEV_REGISTRY_SUFFIX)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };
    !label.is_empty()
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
