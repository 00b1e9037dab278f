//! In-memory message channel for testing and local demos
//!
//! [`LocalChannel`] records every outbound event and lets the caller push
//! inbound events directly. [`LoopbackHub`] connects several channels by
//! user id and relays outbound messages to their recipients, the way a
//! chat relay server would.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parley_core::{LoopbackHub, MessageChannel, OutboundMessage, UserId};
//!
//! let hub = LoopbackHub::new();
//! let alice = hub.connect(UserId::new("alice"));
//! let bob = hub.connect(UserId::new("bob"));
//!
//! let mut inbox = bob.subscribe();
//! alice.emit(OutboundMessage {
//!     recipients: vec![UserId::new("bob")],
//!     text: "hi".into(),
//! })?;
//!
//! let received = inbox.try_recv().unwrap();
//! assert_eq!(received.sender, "alice");
//! assert_eq!(received.recipients, vec![UserId::new("alice")]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::channel::{
    InboundMessage, MessageChannel, OutboundMessage, Subscription, SubscriptionId,
};
use crate::error::ChannelError;
use crate::identity::UserId;

type Listeners = DashMap<SubscriptionId, mpsc::UnboundedSender<InboundMessage>>;

/// In-memory message channel
pub struct LocalChannel {
    /// Registered inbound listeners
    listeners: Arc<Listeners>,
    /// Next listener id
    next_id: AtomicU64,
    /// Every outbound event, in emit order
    outbox: Mutex<Vec<OutboundMessage>>,
    /// Link to a hub when this channel was created by [`LoopbackHub::connect`]
    relay: Option<(UserId, Weak<HubInner>)>,
}

impl LocalChannel {
    /// Create a standalone channel
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
            outbox: Mutex::new(Vec::new()),
            relay: None,
        }
    }

    fn relayed(local_id: UserId, hub: Weak<HubInner>) -> Self {
        Self {
            relay: Some((local_id, hub)),
            ..Self::new()
        }
    }

    /// Push an inbound event to every live listener
    ///
    /// Returns the number of listeners it reached. With no listener the
    /// event is dropped; nothing is queued for later subscribers.
    pub fn deliver(&self, message: InboundMessage) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.listeners.iter() {
            if entry.value().send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }

        for id in closed {
            self.listeners.remove(&id);
        }

        trace!(delivered, sender = %message.sender, "Delivered inbound message");
        delivered
    }

    /// All outbound events emitted so far
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.outbox.lock().clone()
    }

    /// Drain the recorded outbound events
    pub fn take_sent(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.outbox.lock())
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageChannel for LocalChannel {
    fn emit(&self, message: OutboundMessage) -> Result<(), ChannelError> {
        self.outbox.lock().push(message.clone());

        if let Some((local_id, hub)) = &self.relay {
            let hub = hub.upgrade().ok_or(ChannelError::Closed)?;
            hub.route(local_id, &message);
        }

        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.insert(id, tx);
        debug!(subscription = %id, "Registered inbound listener");

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(id, rx, move |id| {
            if let Some(listeners) = listeners.upgrade() {
                listeners.remove(&id);
                debug!(subscription = %id, "Removed inbound listener");
            }
        })
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

struct HubInner {
    clients: DashMap<UserId, Arc<LocalChannel>>,
}

impl HubInner {
    /// Fan an outbound message out to each connected recipient
    ///
    /// Each recipient sees the other recipients plus the sender as the
    /// conversation's recipient list, so both ends key the same thread.
    fn route(&self, from: &UserId, message: &OutboundMessage) {
        for recipient in &message.recipients {
            let Some(client) = self.clients.get(recipient).map(|c| c.clone()) else {
                trace!(recipient = %recipient, "Recipient not connected, dropping");
                continue;
            };

            let mut recipients: Vec<UserId> = message
                .recipients
                .iter()
                .filter(|r| *r != recipient)
                .cloned()
                .collect();
            recipients.push(from.clone());

            client.deliver(InboundMessage {
                recipients,
                text: message.text.clone(),
                sender: from.clone(),
            });
        }
    }
}

/// In-process relay connecting [`LocalChannel`]s by user id
#[derive(Clone)]
pub struct LoopbackHub {
    inner: Arc<HubInner>,
}

impl LoopbackHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                clients: DashMap::new(),
            }),
        }
    }

    /// Connect a client and return its channel
    ///
    /// Connecting the same id again replaces the previous channel.
    pub fn connect(&self, id: UserId) -> Arc<LocalChannel> {
        let channel = Arc::new(LocalChannel::relayed(id.clone(), Arc::downgrade(&self.inner)));
        self.inner.clients.insert(id, channel.clone());
        channel
    }

    /// Disconnect a client; later messages to it are dropped
    pub fn disconnect(&self, id: &UserId) -> bool {
        self.inner.clients.remove(id).is_some()
    }

    /// Whether a client is connected
    pub fn is_connected(&self, id: &UserId) -> bool {
        self.inner.clients.contains_key(id)
    }
}

impl Default for LoopbackHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::user_ids;

    fn outbound(recipients: &[&str], text: &str) -> OutboundMessage {
        OutboundMessage {
            recipients: user_ids(recipients.iter().copied()),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_emit_records_outbox() {
        let channel = LocalChannel::new();
        channel.emit(outbound(&["u2"], "hi")).unwrap();
        assert_eq!(channel.sent(), vec![outbound(&["u2"], "hi")]);
        assert_eq!(channel.take_sent().len(), 1);
        assert!(channel.sent().is_empty());
    }

    #[test]
    fn test_deliver_without_listener_is_lost() {
        let channel = LocalChannel::new();
        let delivered = channel.deliver(InboundMessage {
            recipients: user_ids(["u2"]),
            text: "lost".into(),
            sender: UserId::new("u2"),
        });
        assert_eq!(delivered, 0);

        let mut sub = channel.subscribe();
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_drop_subscription_unregisters() {
        let channel = LocalChannel::new();
        let sub = channel.subscribe();
        assert_eq!(channel.listener_count(), 1);
        drop(sub);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_hub_rewrites_recipients() {
        let hub = LoopbackHub::new();
        let alice = hub.connect(UserId::new("alice"));
        let bob = hub.connect(UserId::new("bob"));
        let carol = hub.connect(UserId::new("carol"));

        let mut bob_inbox = bob.subscribe();
        let mut carol_inbox = carol.subscribe();

        alice.emit(outbound(&["bob", "carol"], "hello both")).unwrap();

        let to_bob = bob_inbox.try_recv().unwrap();
        assert_eq!(to_bob.sender, "alice");
        assert_eq!(to_bob.recipients, user_ids(["carol", "alice"]));

        let to_carol = carol_inbox.try_recv().unwrap();
        assert_eq!(to_carol.recipients, user_ids(["bob", "alice"]));
    }

    #[test]
    fn test_hub_drops_unknown_recipient() {
        let hub = LoopbackHub::new();
        let alice = hub.connect(UserId::new("alice"));
        assert!(alice.emit(outbound(&["ghost"], "anyone?")).is_ok());
        assert!(!hub.is_connected(&UserId::new("ghost")));
    }

    #[test]
    fn test_disconnected_client_stops_receiving() {
        let hub = LoopbackHub::new();
        let alice = hub.connect(UserId::new("alice"));
        let bob = hub.connect(UserId::new("bob"));
        let mut bob_inbox = bob.subscribe();

        assert!(hub.disconnect(&UserId::new("bob")));
        assert!(!hub.is_connected(&UserId::new("bob")));
        assert!(!hub.disconnect(&UserId::new("bob")));

        alice.emit(outbound(&["bob"], "gone?")).unwrap();
        assert!(bob_inbox.try_recv().is_none());
    }

    #[test]
    fn test_emit_after_hub_dropped() {
        let hub = LoopbackHub::new();
        let alice = hub.connect(UserId::new("alice"));
        drop(hub);
        assert_eq!(alice.emit(outbound(&["bob"], "late")), Err(ChannelError::Closed));
    }

    #[tokio::test]
    async fn test_async_receive() {
        let hub = LoopbackHub::new();
        let alice = hub.connect(UserId::new("alice"));
        let bob = hub.connect(UserId::new("bob"));
        let mut inbox = bob.subscribe();

        alice.emit(outbound(&["bob"], "ping")).unwrap();
        let msg = inbox.recv().await.unwrap();
        assert_eq!(msg.text, "ping");
    }
}
