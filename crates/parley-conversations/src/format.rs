//! Display projection of conversations
//!
//! Pure functions of (conversations, contacts, self id, selected index).
//! Nothing here is cached; callers recompute on read, so the result always
//! reflects the current inputs.

use parley_core::{Contact, Conversation, Message, UserId, display_name};
use serde::Serialize;

/// A recipient resolved against the contact directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRecipient {
    pub id: UserId,
    /// Contact name, or the raw id when unknown
    pub name: String,
}

/// A message annotated for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMessage {
    pub sender: UserId,
    pub text: String,
    /// Contact name of the sender, or the raw id when unknown
    pub sender_name: String,
    /// Whether the local user wrote this message
    pub from_me: bool,
}

/// A conversation annotated for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedConversation {
    /// Recipients in stored order
    pub recipients: Vec<FormattedRecipient>,
    pub messages: Vec<FormattedMessage>,
    /// Whether this is the selected conversation
    pub selected: bool,
}

impl FormattedConversation {
    /// Recipient names joined for a sidebar entry
    pub fn title(&self) -> String {
        self.recipients
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn format_message(message: &Message, contacts: &[Contact], self_id: &UserId) -> FormattedMessage {
    FormattedMessage {
        sender: message.sender.clone(),
        text: message.text.clone(),
        sender_name: display_name(contacts, &message.sender),
        from_me: &message.sender == self_id,
    }
}

/// Format a single conversation
pub fn format_conversation(
    conversation: &Conversation,
    contacts: &[Contact],
    self_id: &UserId,
    selected: bool,
) -> FormattedConversation {
    let recipients = conversation
        .recipients
        .iter()
        .map(|id| FormattedRecipient {
            id: id.clone(),
            name: display_name(contacts, id),
        })
        .collect();

    let messages = conversation
        .messages
        .iter()
        .map(|m| format_message(m, contacts, self_id))
        .collect();

    FormattedConversation {
        recipients,
        messages,
        selected,
    }
}

/// Format every conversation, flagging the one at `selected_index`
///
/// When `selected_index` is out of range no conversation is flagged.
pub fn format_conversations(
    conversations: &[Conversation],
    contacts: &[Contact],
    self_id: &UserId,
    selected_index: usize,
) -> Vec<FormattedConversation> {
    conversations
        .iter()
        .enumerate()
        .map(|(index, c)| format_conversation(c, contacts, self_id, index == selected_index))
        .collect()
}
