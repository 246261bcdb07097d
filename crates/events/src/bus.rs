//! Broadcast bus for scope events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::types::{Event, EventEnvelope};

const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out of scope events to any number of subscribers.
///
/// Publishing never blocks or awaits, so a synchronous host can publish
/// from inside a running scope. Subscribers either await `recv` on their
/// receiver or collect what is buffered with [`EventBus::drain`].
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    published: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A bus whose subscribers each buffer at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wrap `event` in a fresh envelope and send it to every subscriber.
    ///
    /// Returns how many subscribers received it; with none the event is
    /// dropped.
    pub fn publish(&self, event: Event) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Only events published after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Collect every event currently buffered for `rx`, oldest first.
    ///
    /// Events a slow receiver already lost are skipped with a warning.
    pub fn drain(rx: &mut broadcast::Receiver<EventEnvelope>) -> Vec<EventEnvelope> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(envelope) => events.push(envelope),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Event receiver lagged, events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events published, whether or not anyone received them.
    pub fn published(&self) -> usize {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("published", &self.published())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn started(path: &str) -> Event {
        Event::ScopeStarted {
            run_id: Uuid::nil(),
            path: path.to_string(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_awaits_scope_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(started("root/given g")), 1);

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event, started("root/given g"));
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_same_envelope() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(started("root")), 2);

        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_publish_without_subscribers_is_counted() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(started("root")), 0);
        assert_eq!(bus.published(), 1);
    }

    #[test]
    fn test_drain_preserves_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(started("a"));
        bus.publish(started("a/b"));

        let paths: Vec<String> = EventBus::drain(&mut rx)
            .into_iter()
            .map(|envelope| envelope.event.path().to_string())
            .collect();
        assert_eq!(paths, vec!["a", "a/b"]);
        assert!(EventBus::drain(&mut rx).is_empty());
    }

    #[test]
    fn test_drain_skips_lagged_events() {
        let bus = EventBus::with_capacity(2);
        let mut rx = bus.subscribe();

        for path in ["a", "b", "c"] {
            bus.publish(started(path));
        }

        let paths: Vec<String> = EventBus::drain(&mut rx)
            .into_iter()
            .map(|envelope| envelope.event.path().to_string())
            .collect();
        assert_eq!(paths, vec!["b", "c"]);
    }

    #[test]
    fn test_clones_share_channel() {
        let bus = EventBus::new();
        let _rx = bus.clone().subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(format!("{:?}", bus), "EventBus { subscribers: 1, published: 0 }");
    }
}
