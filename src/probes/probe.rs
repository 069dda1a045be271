//! Probe abstraction and closure-backed implementation.
//!
//! [`Probe`] is the pluggable readiness predicate consumed by the supervisor;
//! [`ProbeFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! check so no state is shared between polls. The common handle type is
//! [`ProbeRef`], an `Arc<dyn Probe>` suitable for sharing across the runtime.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// Shared handle to a probe.
pub type ProbeRef = Arc<dyn Probe>;

/// One readiness test for one external service.
///
/// A probe must be side-effect-free beyond the network call itself and must
/// not assume any call frequency: the supervisor decides when to poll. Slow
/// checks are bounded by the unit's per-attempt timeout and count as
/// unhealthy when they overrun it.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use stackvisor::Probe;
///
/// struct PidFileProbe;
///
/// #[async_trait]
/// impl Probe for PidFileProbe {
///     async fn check(&self) -> bool {
///         tokio::fs::metadata("/run/app.pid").await.is_ok()
///     }
/// }
/// ```
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Performs one readiness check. `true` means the service accepts work.
    async fn check(&self) -> bool;
}

/// Closure-backed probe.
///
/// Each [`check`](Probe::check) call invokes the closure and awaits the fresh
/// future it returns.
///
/// # Example
/// ```
/// use stackvisor::{Probe, ProbeFn, ProbeRef};
///
/// let probe: ProbeRef = ProbeFn::arc(|| async { true });
/// ```
pub struct ProbeFn<F> {
    f: F,
}

impl<F> ProbeFn<F> {
    /// Creates a new closure-backed probe.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the probe and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Probe for ProbeFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn check(&self) -> bool {
        (self.f)().await
    }
}
