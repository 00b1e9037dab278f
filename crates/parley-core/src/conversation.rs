//! Conversations, messages, and recipient-set matching
//!
//! A conversation carries no id of its own. It is identified, for
//! matching purposes, by the set of its recipients: two recipient lists
//! match when they hold the same ids regardless of order.

use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Contact id of the author, or the local id for our own messages
    pub sender: UserId,
    /// Message body
    pub text: String,
}

impl Message {
    /// Create a new message
    pub fn new(sender: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// A thread of messages exchanged with a set of recipients
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Non-self participants, in the order they were first given
    pub recipients: Vec<UserId>,
    /// Messages in arrival order
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new(recipients: Vec<UserId>) -> Self {
        Self {
            recipients,
            messages: Vec::new(),
        }
    }

    /// Create a conversation seeded with its first message
    pub fn with_message(recipients: Vec<UserId>, message: Message) -> Self {
        Self {
            recipients,
            messages: vec![message],
        }
    }

    /// Whether this conversation belongs to the given recipient set
    pub fn matches(&self, recipients: &[UserId]) -> bool {
        recipients_match(&self.recipients, recipients)
    }
}

/// Order-insensitive equality of two recipient lists
///
/// True iff both have the same length and are element-wise equal after
/// sorting. Sorting happens on borrowed working copies; the inputs keep
/// their order. Duplicates are not collapsed, so `[a, a]` does not match
/// `[a]`.
pub fn recipients_match(a: &[UserId], b: &[UserId]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut a_sorted: Vec<&UserId> = a.iter().collect();
    let mut b_sorted: Vec<&UserId> = b.iter().collect();
    a_sorted.sort_unstable();
    b_sorted.sort_unstable();

    a_sorted == b_sorted
}
