//! BroadcastHub - Fan-out of event envelopes to connected sessions.
//!
//! One hub per process, shared through the application state. Each
//! registered session gets its own bounded queue; the hub never blocks
//! on a slow consumer. A session whose queue is full is disconnected on
//! the spot and catches up through resync when it reconnects.
//!
//! The hub is an [`EventHandler`], subscribed to every kind on the
//! internal bus. Delivery within one session preserves publish order;
//! the hub makes no ordering promise across sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};

use crate::domain::events::{Envelope, EventRecord};
use crate::domain::foundation::DomainError;
use crate::ports::EventHandler;

use super::session::{SessionClientId, Subscription};

struct SessionSlot {
    subscription: Subscription,
    sender: mpsc::Sender<Envelope>,
}

pub struct BroadcastHub {
    sessions: RwLock<HashMap<SessionClientId, SessionSlot>>,
    queue_capacity: usize,
}

impl BroadcastHub {
    /// Creates a hub whose per-session queues hold `queue_capacity`
    /// envelopes before the session is considered too slow.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            queue_capacity,
        }
    }

    /// Registers a new session and returns its id plus the receiving
    /// end of its queue.
    pub async fn register(
        &self,
        subscription: Subscription,
    ) -> (SessionClientId, mpsc::Receiver<Envelope>) {
        let id = SessionClientId::new();
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        self.sessions.write().await.insert(
            id,
            SessionSlot {
                subscription,
                sender,
            },
        );
        tracing::debug!(session = %id, "session registered");
        (id, receiver)
    }

    /// Removes a session. Dropping its sender closes the receiver,
    /// which ends the connection's send loop. Idempotent.
    pub async fn unregister(&self, id: &SessionClientId) {
        if self.sessions.write().await.remove(id).is_some() {
            tracing::debug!(session = %id, "session unregistered");
        }
    }

    /// Delivers the envelope to every matching session.
    ///
    /// Sessions with a full queue are disconnected rather than awaited;
    /// sessions whose receiver is gone are pruned.
    pub async fn publish(&self, envelope: &Envelope) {
        let mut dead = Vec::new();
        {
            let sessions = self.sessions.read().await;
            for (id, slot) in sessions.iter() {
                if !slot.subscription.matches(envelope) {
                    continue;
                }
                match slot.sender.try_send(envelope.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::warn!(
                            session = %id,
                            kind = %envelope.kind(),
                            "session queue full, disconnecting"
                        );
                        dead.push(*id);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        dead.push(*id);
                    }
                }
            }
        }
        if !dead.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in dead {
                sessions.remove(&id);
            }
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the session is still registered. A session evicted for
    /// backpressure disappears from here before its socket notices.
    pub async fn is_registered(&self, id: &SessionClientId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Drops every session, closing all queues. Used on shutdown so
    /// connection tasks wind down before the process exits.
    pub async fn shutdown(&self) {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        if count > 0 {
            tracing::info!(sessions = count, "hub shut down, sessions dropped");
        }
    }
}

#[async_trait]
impl EventHandler for BroadcastHub {
    async fn handle(&self, event: EventRecord) -> Result<(), DomainError> {
        self.publish(&event.envelope).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "BroadcastHub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::appointment::tests::draft;
    use crate::domain::appointment::Appointment;
    use crate::domain::events::EventKind;
    use crate::domain::shop::ShopState;

    fn shop_envelope() -> Envelope {
        Envelope::ShopUpdate(ShopState::default())
    }

    fn appointment_envelope(owner: &str) -> Envelope {
        let mut d = draft();
        d.my_id = Some(owner.to_string());
        Envelope::AppointmentUpdate(Appointment::create(d).unwrap())
    }

    #[tokio::test]
    async fn publish_reaches_every_open_session() {
        let hub = BroadcastHub::new(8);
        let (_a, mut rx_a) = hub.register(Subscription::all()).await;
        let (_b, mut rx_b) = hub.register(Subscription::all()).await;

        hub.publish(&shop_envelope()).await;

        assert_eq!(rx_a.recv().await.unwrap().kind(), EventKind::ShopUpdate);
        assert_eq!(rx_b.recv().await.unwrap().kind(), EventKind::ShopUpdate);
    }

    #[tokio::test]
    async fn delivery_preserves_publish_order_per_session() {
        let hub = BroadcastHub::new(8);
        let (_id, mut rx) = hub.register(Subscription::all()).await;

        hub.publish(&appointment_envelope("a")).await;
        hub.publish(&shop_envelope()).await;

        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::AppointmentUpdate);
        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::ShopUpdate);
    }

    #[tokio::test]
    async fn subscription_filters_are_honored() {
        let hub = BroadcastHub::new(8);
        let (_id, mut rx) = hub
            .register(Subscription::all().with_kinds([EventKind::ShopUpdate]))
            .await;

        hub.publish(&appointment_envelope("a")).await;
        hub.publish(&shop_envelope()).await;

        // The appointment envelope never entered the queue.
        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::ShopUpdate);
    }

    #[tokio::test]
    async fn owner_scoped_session_sees_only_its_appointments() {
        let hub = BroadcastHub::new(8);
        let (_id, mut rx) = hub
            .register(Subscription::all().with_owner("client-1"))
            .await;

        hub.publish(&appointment_envelope("client-2")).await;
        hub.publish(&appointment_envelope("client-1")).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.owner(), Some("client-1"));
    }

    #[tokio::test]
    async fn full_queue_disconnects_the_session() {
        let hub = BroadcastHub::new(2);
        let (id, mut rx) = hub.register(Subscription::all()).await;
        let (other, mut other_rx) = hub.register(Subscription::all()).await;

        // Fill the first queue while the other session keeps draining.
        hub.publish(&shop_envelope()).await;
        hub.publish(&shop_envelope()).await;
        assert!(other_rx.recv().await.is_some());
        assert!(other_rx.recv().await.is_some());

        // The third publish overflows only the undrained queue.
        hub.publish(&shop_envelope()).await;

        assert!(!hub.is_registered(&id).await);
        assert!(hub.is_registered(&other).await);

        // The slow session still drains what was queued, then sees the
        // channel close.
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());

        // The draining session got the third as well.
        assert!(other_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_next_publish() {
        let hub = BroadcastHub::new(8);
        let (id, rx) = hub.register(Subscription::all()).await;
        drop(rx);

        hub.publish(&shop_envelope()).await;
        assert!(!hub.is_registered(&id).await);
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let hub = BroadcastHub::new(8);
        let (id, _rx) = hub.register(Subscription::all()).await;

        hub.unregister(&id).await;
        hub.unregister(&id).await;
        assert_eq!(hub.session_count().await, 0);
    }

    #[tokio::test]
    async fn shutdown_closes_all_queues() {
        let hub = BroadcastHub::new(8);
        let (_a, mut rx_a) = hub.register(Subscription::all()).await;
        let (_b, mut rx_b) = hub.register(Subscription::all()).await;

        hub.shutdown().await;

        assert!(rx_a.recv().await.is_none());
        assert!(rx_b.recv().await.is_none());
        assert_eq!(hub.session_count().await, 0);
    }

    #[tokio::test]
    async fn handles_bus_records_by_forwarding_the_envelope() {
        use crate::domain::events::Verb;

        let hub = BroadcastHub::new(8);
        let (_id, mut rx) = hub.register(Subscription::all()).await;

        let record = EventRecord::new(Verb::Updated, shop_envelope());
        hub.handle(record).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::ShopUpdate);
    }
}
