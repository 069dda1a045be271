//! TCP port-reachability probe.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::probes::probe::Probe;

/// Readiness probe that attempts a TCP connection.
///
/// Healthy means the listener accepted a connection; the stream is dropped
/// immediately. This is the classic "wait for port 5432" gate used when a
/// service exposes no richer health endpoint.
///
/// The connect attempt itself has no internal timeout: the caller's
/// per-attempt budget (see [`UnitTimeouts::probe_attempt`](crate::UnitTimeouts))
/// bounds it.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
}

impl TcpProbe {
    /// Creates a probe for `addr` (e.g. `"127.0.0.1:5432"`).
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Creates the probe and returns it as a shared handle.
    pub fn arc(addr: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(addr))
    }

    /// Returns the probed address.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn check(&self) -> bool {
        TcpStream::connect(&self.addr).await.is_ok()
    }
}
