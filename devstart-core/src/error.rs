//! Error types for devstart-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving the app identity out of project metadata.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// `arapp.json` could not be read.
    #[error("cannot read project metadata at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `arapp.json` is not valid JSON.
    #[error("failed to parse project metadata at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `environments.default.appName` is absent or not a string.
    #[error("missing environments.default.appName in {path}")]
    MissingAppName { path: PathBuf },
}

/// Errors from loading `devstart.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
