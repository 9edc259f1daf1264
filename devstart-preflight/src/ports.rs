//! Port availability: fail if anything already listens on a session port.
//!
//! Ports are probed one at a time in a fixed order (client, app, then any
//! extra ports) and the first bound port aborts the check. This is a
//! best-effort precondition; nothing is reserved, so a process may still grab
//! the port between the probe and the launcher binding it.

use std::fmt;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr};

use devstart_core::DevConfig;

use crate::error::{PreflightError, ValidationOutcome};

/// What a probed port is used for. Drives the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Client,
    App,
    Extra,
}

impl PortRole {
    /// The action that cannot proceed when this port is taken.
    pub fn action(self) -> &'static str {
        match self {
            PortRole::Client => "start client",
            PortRole::App => "serve app",
            PortRole::Extra => "start development stack",
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRole::Client => write!(f, "client"),
            PortRole::App => write!(f, "app"),
            PortRole::Extra => write!(f, "extra"),
        }
    }
}

/// Something that can tell whether a local TCP port already has a listener.
#[allow(async_fn_in_trait)]
pub trait PortProbe {
    /// `Ok(true)` when `port` is bound.
    async fn is_bound(&self, port: u16) -> std::io::Result<bool>;
}

/// Probes by connecting to `host:port`: an accepted connection means bound,
/// a refused one means free.
#[derive(Debug, Clone, Copy)]
pub struct TcpPortProbe {
    pub host: IpAddr,
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

impl PortProbe for TcpPortProbe {
    async fn is_bound(&self, port: u16) -> std::io::Result<bool> {
        match tokio::net::TcpStream::connect((self.host, port)).await {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::ConnectionRefused => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// Ports to probe, in probe order.
pub fn probe_order(config: &DevConfig) -> Vec<(PortRole, u16)> {
    let mut ports = vec![
        (PortRole::Client, config.client_serve_port),
        (PortRole::App, config.app_serve_port),
    ];
    ports.extend(config.extra_ports.iter().map(|port| (PortRole::Extra, *port)));
    ports
}

/// Probe every session port in order, stopping at the first bound one.
pub async fn check_ports(probe: &impl PortProbe, config: &DevConfig) -> ValidationOutcome {
    for (role, port) in probe_order(config) {
        let bound = probe
            .is_bound(port)
            .await
            .map_err(|source| PreflightError::PortProbe { port, source })?;
        if bound {
            return Err(PreflightError::PortInUse { port, role });
        }
    }
    Ok(())
}
