//! Port checker ordering and real-socket probe tests.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use devstart_core::DevConfig;
use devstart_preflight::{check_ports, PortProbe, PortRole, PreflightError, TcpPortProbe};
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Probe backed by a fixed set of bound ports that records every call.
#[derive(Default)]
struct FakeProbe {
    bound: HashSet<u16>,
    broken: HashSet<u16>,
    probed: Mutex<Vec<u16>>,
}

impl FakeProbe {
    fn bound(ports: &[u16]) -> Self {
        Self {
            bound: ports.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn probed(&self) -> Vec<u16> {
        self.probed.lock().expect("probe log").clone()
    }
}

impl PortProbe for FakeProbe {
    async fn is_bound(&self, port: u16) -> io::Result<bool> {
        self.probed.lock().expect("probe log").push(port);
        if self.broken.contains(&port) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "probe denied"));
        }
        Ok(self.bound.contains(&port))
    }
}

fn config(client: u16, app: u16, extra: &[u16]) -> DevConfig {
    DevConfig {
        client_serve_port: client,
        app_serve_port: app,
        app_src_path: PathBuf::from("app"),
        extra_ports: extra.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// 1. Ordering and fail-fast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_free_probes_every_port_in_order() {
    let probe = FakeProbe::default();
    check_ports(&probe, &config(3000, 8001, &[8545])).await.expect("ports free");
    assert_eq!(probe.probed(), vec![3000, 8001, 8545]);
}

#[tokio::test]
async fn bound_client_port_stops_before_app_port() {
    let probe = FakeProbe::bound(&[3000, 8001]);
    let err = check_ports(&probe, &config(3000, 8001, &[])).await.unwrap_err();
    assert!(
        matches!(err, PreflightError::PortInUse { port: 3000, role: PortRole::Client }),
        "got: {err}"
    );
    assert_eq!(probe.probed(), vec![3000], "app port must not be probed");
}

#[tokio::test]
async fn bound_app_port_is_reported_after_second_probe() {
    let probe = FakeProbe::bound(&[8001]);
    let err = check_ports(&probe, &config(3000, 8001, &[])).await.unwrap_err();
    assert!(
        matches!(err, PreflightError::PortInUse { port: 8001, role: PortRole::App }),
        "got: {err}"
    );
    assert_eq!(err.to_string(), "Cannot serve app. Port 8001 is in use.");
    assert_eq!(probe.probed(), vec![3000, 8001]);
}

#[tokio::test]
async fn bound_extra_port_is_reported() {
    let probe = FakeProbe::bound(&[8545]);
    let err = check_ports(&probe, &config(3000, 8001, &[8545, 9000])).await.unwrap_err();
    assert!(
        matches!(err, PreflightError::PortInUse { port: 8545, role: PortRole::Extra }),
        "got: {err}"
    );
    assert_eq!(probe.probed(), vec![3000, 8001, 8545]);
}

#[tokio::test]
async fn probe_failure_is_reported_with_port() {
    let probe = FakeProbe {
        broken: [3000].into_iter().collect(),
        ..FakeProbe::default()
    };
    let err = check_ports(&probe, &config(3000, 8001, &[])).await.unwrap_err();
    assert!(matches!(err, PreflightError::PortProbe { port: 3000, .. }), "got: {err}");
    assert_eq!(probe.probed(), vec![3000]);
}

#[tokio::test]
async fn same_port_state_gives_same_failure() {
    let probe = FakeProbe::bound(&[8001]);
    for _ in 0..3 {
        let err = check_ports(&probe, &config(3000, 8001, &[])).await.unwrap_err();
        assert!(matches!(err, PreflightError::PortInUse { port: 8001, .. }));
    }
}

// ---------------------------------------------------------------------------
// 2. TCP probe against real sockets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tcp_probe_sees_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let bound = TcpPortProbe::default().is_bound(port).await.expect("probe");
    assert!(bound, "port {port} has a listener");
}

#[tokio::test]
async fn tcp_probe_reports_free_port() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let bound = TcpPortProbe::default().is_bound(port).await.expect("probe");
    assert!(!bound, "port {port} was released");
}

#[tokio::test]
async fn tcp_probe_flags_bound_app_port_through_checker() {
    let free = {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let taken = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let taken_port = taken.local_addr().expect("addr").port();

    let err = check_ports(&TcpPortProbe::default(), &config(free, taken_port, &[]))
        .await
        .unwrap_err();
    assert!(
        matches!(err, PreflightError::PortInUse { port, role: PortRole::App } if port == taken_port),
        "got: {err}"
    );
}
