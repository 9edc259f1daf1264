//! devstart core library: domain types, identity resolution, configuration, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`IdentityError`], [`ConfigError`]
//! - [`identity`]: `arapp.json` resolution, app id derivation, name validation
//! - [`config`]: `devstart.yaml` loading

pub mod config;
pub mod error;
pub mod identity;
pub mod types;

pub use config::{DevstartConfig, LaunchCommand};
pub use error::{ConfigError, IdentityError};
pub use types::{AppId, BackendHandle, DevConfig, EnsName, ProjectIdentity};
