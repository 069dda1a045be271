//! Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format:
//!
//! ```text
//! [waiting] unit=app attempt=1
//! [starting] unit=app attempt=1
//! [running] unit=app attempt=1
//! [failed] unit=app attempt=1 reason="readiness probe gave no healthy result within 30s"
//! [backoff] unit=app delay_ms=500 after_attempt=1
//! [stopped] unit=app
//! [shutdown-requested]
//! [all-stopped-within-grace]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout logging subscriber (feature `logging`).
///
/// Intended for development and demos; implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let unit = e.unit.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::UnitWaiting => {
                println!("[waiting] unit={unit} attempt={:?}", e.attempt);
            }
            EventKind::UnitStarting => {
                println!("[starting] unit={unit} attempt={:?}", e.attempt);
            }
            EventKind::UnitRunning => {
                println!("[running] unit={unit} attempt={:?}", e.attempt);
            }
            EventKind::UnitStopped => {
                println!("[stopped] unit={unit}");
            }
            EventKind::UnitFailed => {
                println!(
                    "[failed] unit={unit} attempt={:?} reason={:?}",
                    e.attempt, e.reason
                );
            }
            EventKind::BackoffScheduled => {
                println!(
                    "[backoff] unit={unit} delay_ms={:?} after_attempt={:?}",
                    e.delay_ms, e.attempt
                );
            }
            EventKind::RestartRequested => {
                println!("[restart-requested] unit={unit}");
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-grace]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded] stuck={:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] name={unit} info={:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
