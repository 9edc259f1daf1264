//! Preflight checks for `devstart-preflight`.
//!
//! Three checkers, each returning a [`ValidationOutcome`]:
//! - [`identity::check_identity`]: development name convention (pure)
//! - [`ports::check_ports`]: nothing already listening on the session ports
//! - [`scripts::check_scripts`]: required scripts present in `package.json`
//!
//! Every checker is fail-fast: the first problem is returned and nothing after
//! it is inspected.

pub mod error;
pub mod identity;
pub mod ports;
pub mod scripts;

pub use error::{PreflightError, ValidationOutcome};
pub use ports::{check_ports, PortProbe, PortRole, TcpPortProbe};
pub use scripts::{check_scripts, REQUIRED_SCRIPTS};
