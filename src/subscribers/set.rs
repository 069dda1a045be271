//! Non-blocking fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`] to all subscribers without
//! awaiting their processing.
//!
//! ## Guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside a subscriber are caught and published as
//!   [`EventKind::SubscriberPanicked`].
//!
//! ## Not guaranteed
//! - No global ordering across different subscribers.
//! - No retries on queue overflow: the event is dropped for that subscriber.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::events::{Bus, Event, EventKind};

use super::Subscribe;

/// Per-subscriber channel with metadata.
struct Channel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<Channel>,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker per subscriber.
    ///
    /// `bus` is used to report subscriber panics; panic events are delivered
    /// to the other subscribers like any lifecycle event.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());

        for sub in subs {
            let capacity = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(capacity);
            let bus = bus.clone();

            tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        bus.publish(
                            Event::now(EventKind::SubscriberPanicked)
                                .with_unit(sub.name())
                                .with_reason(format!("{panic:?}")),
                        );
                    }
                }
            });

            channels.push(Channel { name, sender: tx });
        }

        Self { channels }
    }

    /// Fans one event out to all subscribers without awaiting them.
    ///
    /// A full or closed queue drops the event for that subscriber only.
    pub fn emit(&self, event: &Event) {
        // Skip a subscriber's own panic reports to avoid a feedback loop.
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            if event.kind == EventKind::SubscriberPanicked
                && event.unit.as_deref() == Some(channel.name)
            {
                continue;
            }
            let _ = channel.sender.try_send(Arc::clone(&ev));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct Counter(Arc<AtomicU32>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counter"
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[tokio::test]
    async fn test_events_reach_every_subscriber() {
        let bus = Bus::new(16);
        let seen = Arc::new(AtomicU32::new(0));
        let set = SubscriberSet::new(vec![Arc::new(Counter(seen.clone()))], bus);

        for _ in 0..5 {
            set.emit(&Event::now(EventKind::UnitRunning).with_unit("db"));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let seen = Arc::new(AtomicU32::new(0));
        let set = SubscriberSet::new(
            vec![Arc::new(Panicker), Arc::new(Counter(seen.clone()))],
            bus,
        );

        set.emit(&Event::now(EventKind::UnitFailed).with_unit("app"));
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The healthy subscriber still saw the event.
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        // The panic was reported on the bus.
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.unit.as_deref(), Some("panicker"));
    }
}
