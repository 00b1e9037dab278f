//! # Parley Conversations
//!
//! Conversation state management for the Parley chat client.
//!
//! [`ConversationStore`] owns the conversation list and the selected
//! index. It matches every incoming or outgoing message to the
//! conversation with the same recipient set (creating one when none
//! matches), persists the list after each mutation, and produces a
//! display-ready projection enriched with contact names.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use parley_conversations::{ContactBook, ConversationStore};
//! use parley_core::{LoopbackHub, UserId, user_ids};
//! use parley_storage::InMemoryStore;
//!
//! let storage = Arc::new(InMemoryStore::new());
//! let contacts = Arc::new(ContactBook::open(storage.clone()));
//! contacts.create_contact(UserId::new("u2"), "Bob")?;
//!
//! let mut store = ConversationStore::open(UserId::new("u1"), storage, contacts);
//! let hub = LoopbackHub::new();
//! store.attach_channel(hub.connect(UserId::new("u1")));
//!
//! store.send_message(user_ids(["u2"]), "hi")?;
//! let selected = store.selected_conversation().unwrap();
//! assert_eq!(selected.recipients[0].name, "Bob");
//! assert!(selected.messages[0].from_me);
//! ```

pub mod contacts;
pub mod error;
pub mod format;
pub mod store;

// Re-exports
pub use contacts::ContactBook;
pub use error::{ConversationError, ConversationResult};
pub use format::{
    FormattedConversation, FormattedMessage, FormattedRecipient, format_conversation,
    format_conversations,
};
pub use store::ConversationStore;

/// Storage key of the local identity
pub const ID_KEY: &str = "id";

/// Storage key of the contact list
pub const CONTACTS_KEY: &str = "contacts";

/// Storage key of the conversation list
pub const CONVERSATIONS_KEY: &str = "conversations";
