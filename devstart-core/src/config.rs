//! `devstart.yaml`: per-project session configuration.
//!
//! # Layout
//!
//! ```text
//! client_serve_port: 3000
//! app_serve_port: 8001
//! app_src_path: app
//! extra_ports: [8545]
//! backend:
//!   program: npx
//!   args: [devchain-up, --json]
//! frontend:
//!   program: npx
//!   args: [client-serve]
//! ```
//!
//! Every key is optional. Defaults are filled in here, by the configuration
//! layer; the sequencer only ever sees a complete [`DevConfig`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::DevConfig;

/// Config file name, relative to the project root.
pub const CONFIG_FILE: &str = "devstart.yaml";

pub const DEFAULT_CLIENT_SERVE_PORT: u16 = 3000;
pub const DEFAULT_APP_SERVE_PORT: u16 = 8001;
pub const DEFAULT_APP_SRC_PATH: &str = "app";

/// A program to spawn for one side of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment passed to the child on top of the session variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Root of `devstart.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevstartConfig {
    #[serde(default = "default_client_serve_port")]
    pub client_serve_port: u16,
    #[serde(default = "default_app_serve_port")]
    pub app_serve_port: u16,
    #[serde(default = "default_app_src_path")]
    pub app_src_path: PathBuf,
    #[serde(default)]
    pub extra_ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<LaunchCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend: Option<LaunchCommand>,
}

fn default_client_serve_port() -> u16 {
    DEFAULT_CLIENT_SERVE_PORT
}

fn default_app_serve_port() -> u16 {
    DEFAULT_APP_SERVE_PORT
}

fn default_app_src_path() -> PathBuf {
    PathBuf::from(DEFAULT_APP_SRC_PATH)
}

impl Default for DevstartConfig {
    fn default() -> Self {
        Self {
            client_serve_port: DEFAULT_CLIENT_SERVE_PORT,
            app_serve_port: DEFAULT_APP_SERVE_PORT,
            app_src_path: default_app_src_path(),
            extra_ports: Vec::new(),
            backend: None,
            frontend: None,
        }
    }
}

impl DevstartConfig {
    /// The session view of this config. Relative `app_src_path` is resolved
    /// against `project_root`.
    pub fn dev_config(&self, project_root: &Path) -> DevConfig {
        DevConfig {
            client_serve_port: self.client_serve_port,
            app_serve_port: self.app_serve_port,
            app_src_path: project_root.join(&self.app_src_path),
            extra_ports: self.extra_ports.clone(),
        }
    }
}

/// `<project>/devstart.yaml`: pure, no I/O.
pub fn config_path_at(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE)
}

/// Load config from `explicit` if given, else from `<project>/devstart.yaml`.
///
/// A missing default file yields [`DevstartConfig::default`]; a missing
/// explicit file is an error.
pub fn load_at(project_root: &Path, explicit: Option<&Path>) -> Result<DevstartConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_path_at(project_root);
            if !path.exists() {
                return Ok(DevstartConfig::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse(&path, &contents)
}

/// Parse config text. An empty document is the default config.
pub fn parse(path: &Path, contents: &str) -> Result<DevstartConfig, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(DevstartConfig::default());
    }
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
