use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::model::{Booking, StoreEvent};
use crate::observability;

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for committed store mutations, one channel per room.
pub struct NotifyHub {
    channels: DashMap<String, broadcast::Sender<StoreEvent>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to events for a room. Creates the channel if needed.
    pub fn subscribe(&self, room: &str) -> broadcast::Receiver<StoreEvent> {
        let sender = self
            .channels
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send an event. No-op if nobody is listening.
    pub fn send(&self, room: &str, event: &StoreEvent) {
        if let Some(sender) = self.channels.get(room) {
            let _ = sender.send(event.clone());
        }
    }

    /// Remove a room's channel.
    pub fn remove(&self, room: &str) {
        self.channels.remove(room);
    }
}

/// Outward notification seam — email or equivalent. Delivery is
/// best-effort: implementations report failure, they never retry the
/// store's state back.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmed(&self, booking: &Booking) -> Result<(), NotifyError>;
}

#[derive(Debug)]
pub struct NotifyError(pub String);

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// Fire a confirmation and swallow the failure. The booking is already
/// committed; a dead SMTP relay must not unwind it.
pub async fn notify_soft(notifier: &dyn Notifier, booking: &Booking) {
    if let Err(e) = notifier.booking_confirmed(booking).await {
        metrics::counter!(observability::NOTIFY_FAILURES_TOTAL).increment(1);
        tracing::warn!(id = %booking.id, email = %booking.email, "confirmation not sent: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Slot};
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ulid::Ulid;

    fn sample_booking(room: &str) -> Booking {
        Booking {
            id: Ulid::new(),
            user: "Ada".into(),
            email: "ada@example.com".into(),
            room: room.into(),
            slot: Slot::on(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ),
            priority: Priority::Medium,
            description: None,
        }
    }

    #[tokio::test]
    async fn subscribe_and_receive() {
        let hub = NotifyHub::new();
        let mut rx = hub.subscribe("Room A");

        let event = StoreEvent::Added(sample_booking("Room A"));
        hub.send("Room A", &event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn send_without_subscribers_is_noop() {
        let hub = NotifyHub::new();
        // No subscriber — should not panic
        hub.send("Room B", &StoreEvent::Removed(sample_booking("Room B")));
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let hub = NotifyHub::new();
        let mut rx_a = hub.subscribe("Room A");
        let _rx_b = hub.subscribe("Room B");

        hub.send("Room B", &StoreEvent::Added(sample_booking("Room B")));
        assert!(matches!(
            rx_a.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    struct FailingNotifier(AtomicUsize);

    #[async_trait::async_trait]
    impl Notifier for FailingNotifier {
        async fn booking_confirmed(&self, _booking: &Booking) -> Result<(), NotifyError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError("relay down".into()))
        }
    }

    #[tokio::test]
    async fn notify_soft_swallows_failure() {
        let notifier = FailingNotifier(AtomicUsize::new(0));
        notify_soft(&notifier, &sample_booking("Room A")).await;
        assert_eq!(notifier.0.load(Ordering::SeqCst), 1);
    }
}
