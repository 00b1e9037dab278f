//! Message channel abstraction
//!
//! The channel is an external bidirectional event transport with two
//! contracted events: outbound [`SEND_MESSAGE`] and inbound
//! [`RECEIVE_MESSAGE`]. Delivery is best-effort; there is no
//! acknowledgment or retry.
//!
//! Inbound events are observed through a [`Subscription`]. Dropping or
//! cancelling the subscription unregisters the listener from the
//! channel, so a consumer that re-subscribes after cancelling the old
//! token never has two listeners active.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::ChannelError;
use crate::identity::UserId;

/// Event name for outbound messages
pub const SEND_MESSAGE: &str = "send-message";

/// Event name for inbound messages
pub const RECEIVE_MESSAGE: &str = "receive-message";

/// Payload of an outbound [`SEND_MESSAGE`] event
///
/// Carries no sender; the receiving side attaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipients: Vec<UserId>,
    pub text: String,
}

/// Payload of an inbound [`RECEIVE_MESSAGE`] event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub recipients: Vec<UserId>,
    pub text: String,
    pub sender: UserId,
}

/// Identifier of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Trait for the bidirectional message channel
///
/// Implementations must deliver inbound events to each live subscription
/// in arrival order.
pub trait MessageChannel: Send + Sync {
    /// Emit an outbound message event
    fn emit(&self, message: OutboundMessage) -> Result<(), ChannelError>;

    /// Register a new inbound listener
    fn subscribe(&self) -> Subscription;

    /// Number of currently registered listeners
    fn listener_count(&self) -> usize;
}

type CancelFn = Box<dyn FnOnce(SubscriptionId) + Send + Sync>;

/// Handle to one registered inbound listener
///
/// The listener stays registered until the handle is cancelled or dropped.
pub struct Subscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<InboundMessage>,
    on_cancel: Option<CancelFn>,
}

impl Subscription {
    /// Create a subscription handle
    ///
    /// `on_cancel` runs exactly once, when the handle is cancelled or dropped,
    /// and must remove the listener from the channel.
    pub fn new(
        id: SubscriptionId,
        receiver: mpsc::UnboundedReceiver<InboundMessage>,
        on_cancel: impl FnOnce(SubscriptionId) + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            receiver,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Get the subscription id
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take the next pending event without waiting
    pub fn try_recv(&mut self) -> Option<InboundMessage> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the channel side has gone away.
    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.receiver.recv().await
    }

    /// Unregister the listener
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            self.receiver.close();
            on_cancel(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
