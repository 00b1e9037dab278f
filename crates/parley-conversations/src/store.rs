//! Conversation store
//!
//! Owns the conversation list and the selected index. All mutations go
//! through `&mut self`, so one owner serializes them; inbound channel
//! events are applied one at a time, in arrival order, by
//! [`ConversationStore::process_inbound`] or
//! [`ConversationStore::next_inbound`].

use std::sync::Arc;

use parley_core::{
    ContactDirectory, Conversation, InboundMessage, Message, MessageChannel, OutboundMessage,
    Subscription, UserId,
};
use parley_storage::{KeyValueStore, load_or_default, save};
use tracing::{debug, info, warn};

use crate::CONVERSATIONS_KEY;
use crate::error::ConversationResult;
use crate::format::{FormattedConversation, format_conversation, format_conversations};

/// Conversation state for one local identity
pub struct ConversationStore {
    /// Our identity
    self_id: UserId,
    /// Persistence for the conversation list
    storage: Arc<dyn KeyValueStore>,
    /// Name source for the display projection
    contacts: Arc<dyn ContactDirectory>,
    /// Conversations in creation order
    conversations: Vec<Conversation>,
    /// Index of the active conversation; not bounds-checked
    selected_index: usize,
    /// Current channel, if connected
    channel: Option<Arc<dyn MessageChannel>>,
    /// The single active inbound listener
    subscription: Option<Subscription>,
    /// Bumped on every mutation
    revision: u64,
}

impl ConversationStore {
    /// Load the conversation list for `self_id`
    ///
    /// Missing or malformed persisted state yields an empty list. The
    /// store starts with no channel and selection index 0.
    pub fn open(
        self_id: UserId,
        storage: Arc<dyn KeyValueStore>,
        contacts: Arc<dyn ContactDirectory>,
    ) -> Self {
        let conversations: Vec<Conversation> = load_or_default(&*storage, CONVERSATIONS_KEY);
        info!(self_id = %self_id, conversations = conversations.len(), "Opened conversation store");

        Self {
            self_id,
            storage,
            contacts,
            conversations,
            selected_index: 0,
            channel: None,
            subscription: None,
            revision: 0,
        }
    }

    /// Get our identity
    pub fn self_id(&self) -> &UserId {
        &self.self_id
    }

    /// Raw conversations, in list order
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Currently selected index
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Mutation counter; changes whenever the conversation list does
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Start a new, empty conversation
    ///
    /// Existing conversations with the same recipients are left alone, so
    /// calling this twice yields two entries.
    pub fn create_conversation(&mut self, recipients: Vec<UserId>) -> ConversationResult<()> {
        debug!(recipients = ?recipients, "Creating conversation");
        self.conversations.push(Conversation::new(recipients));
        self.commit()
    }

    /// Append a message to the conversation matching its recipient set
    ///
    /// The first conversation in list order whose recipients match wins.
    /// With no match, a new conversation holding just this message is
    /// appended. Not idempotent: the same message twice is stored twice.
    pub fn add_message_to_conversation(
        &mut self,
        message: InboundMessage,
    ) -> ConversationResult<()> {
        let InboundMessage {
            recipients,
            text,
            sender,
        } = message;
        let new_message = Message { sender, text };

        match self.conversations.iter().position(|c| c.matches(&recipients)) {
            Some(index) => {
                let conversation = &mut self.conversations[index];
                conversation.messages.push(new_message);
                debug!(
                    recipients = ?conversation.recipients,
                    messages = conversation.messages.len(),
                    "Appended message to conversation"
                );
            }
            None => {
                debug!(recipients = ?recipients, "No matching conversation, creating one");
                self.conversations
                    .push(Conversation::with_message(recipients, new_message));
            }
        }

        self.commit()
    }

    /// Send a message and echo it locally
    ///
    /// The outbound event carries only recipients and text. The local copy
    /// is recorded with our id as sender without waiting for the channel;
    /// if the channel is missing or the emit fails the echo still happens.
    pub fn send_message(
        &mut self,
        recipients: Vec<UserId>,
        text: impl Into<String>,
    ) -> ConversationResult<()> {
        let text = text.into();

        match &self.channel {
            Some(channel) => {
                let outbound = OutboundMessage {
                    recipients: recipients.clone(),
                    text: text.clone(),
                };
                if let Err(e) = channel.emit(outbound) {
                    warn!(error = %e, "Failed to emit message, keeping local copy");
                }
            }
            None => warn!("No channel connected, message kept locally only"),
        }

        let sender = self.self_id.clone();
        self.add_message_to_conversation(InboundMessage {
            recipients,
            text,
            sender,
        })
    }

    /// Set the selected index; no bounds validation
    pub fn select_conversation_index(&mut self, index: usize) {
        debug!(index, "Selecting conversation");
        self.selected_index = index;
    }

    /// Display projection of every conversation
    pub fn formatted_conversations(&self) -> Vec<FormattedConversation> {
        let contacts = self.contacts.contacts();
        format_conversations(
            &self.conversations,
            &contacts,
            &self.self_id,
            self.selected_index,
        )
    }

    /// Display projection of the selected conversation
    ///
    /// `None` when the list is empty or the index is out of range.
    pub fn selected_conversation(&self) -> Option<FormattedConversation> {
        let conversation = self.conversations.get(self.selected_index)?;
        let contacts = self.contacts.contacts();
        Some(format_conversation(conversation, &contacts, &self.self_id, true))
    }

    /// Connect a channel, replacing any previous one
    ///
    /// The old subscription is cancelled before the new one is registered,
    /// so at most one listener is ever active.
    pub fn attach_channel(&mut self, channel: Arc<dyn MessageChannel>) {
        if let Some(old) = self.subscription.take() {
            debug!(subscription = %old.id(), "Cancelling previous subscription");
            old.cancel();
        }

        let subscription = channel.subscribe();
        info!(subscription = %subscription.id(), "Subscribed to inbound messages");
        self.subscription = Some(subscription);
        self.channel = Some(channel);
    }

    /// Disconnect the channel; inbound events are no longer observed
    pub fn detach_channel(&mut self) {
        if let Some(old) = self.subscription.take() {
            old.cancel();
        }
        self.channel = None;
    }

    /// Whether a channel is connected
    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Apply every inbound event already waiting, in arrival order
    ///
    /// Returns how many were applied. Without a channel this is a no-op.
    pub fn process_inbound(&mut self) -> ConversationResult<usize> {
        let mut applied = 0;
        while let Some(message) = self.subscription.as_mut().and_then(|s| s.try_recv()) {
            self.add_message_to_conversation(message)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Wait for the next inbound event and apply it
    ///
    /// Returns `Ok(false)` when there is no subscription or the channel
    /// has closed.
    pub async fn next_inbound(&mut self) -> ConversationResult<bool> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(false);
        };

        match subscription.recv().await {
            Some(message) => {
                self.add_message_to_conversation(message)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn commit(&mut self) -> ConversationResult<()> {
        self.revision += 1;
        save(&*self.storage, CONVERSATIONS_KEY, &self.conversations)?;
        Ok(())
    }
}
