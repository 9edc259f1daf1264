//! Domain types for a development session.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A dotted, namespaced app name such as `myapp.aragonpm.eth`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnsName(pub String);

impl EnsName {
    /// The dot-separated labels, left to right, exactly as written.
    ///
    /// The empty name has no labels; any other name yields one label per
    /// dot-separated segment, empty segments included.
    pub fn labels(&self) -> impl DoubleEndedIterator<Item = &str> {
        (!self.0.is_empty())
            .then(|| self.0.split('.'))
            .into_iter()
            .flatten()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EnsName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EnsName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Content-addressed app identifier: `0x` followed by 64 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(pub String);

impl AppId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Who the app module is. Built once per invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectIdentity {
    /// Short app name, the first label of `ens_like_name`.
    pub name: String,
    pub ens_like_name: EnsName,
    pub id: AppId,
}

/// Ports and paths for one development session.
///
/// The sequencer only reads this; defaults belong to the configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevConfig {
    /// Port the browser client is served on. Probed first.
    pub client_serve_port: u16,
    /// Port the app frontend bundle is served on.
    pub app_serve_port: u16,
    /// Directory holding the app's `package.json`.
    pub app_src_path: PathBuf,
    /// Additional ports the stack binds, probed after the two above.
    pub extra_ports: Vec<u16>,
}

/// Addresses produced by the backend and handed to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHandle {
    pub dao_address: String,
    pub app_address: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
