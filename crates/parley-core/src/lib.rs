//! # Parley Core
//!
//! Core types, traits, and errors for the Parley chat client.
//!
//! This crate holds the vocabulary shared by every other Parley crate, so
//! that conversation logic can run against an in-memory channel in tests
//! and a real transport in production without changes.
//!
//! ## Key Traits
//!
//! - [`MessageChannel`]: Bidirectional event channel for send/receive message events
//! - [`ContactDirectory`]: Read-only id -> display name lookup
//!
//! ## Key Types
//!
//! - [`UserId`]: String identity of a chat participant
//! - [`Conversation`]: A recipient-set-keyed thread of [`Message`]s
//! - [`Subscription`]: Token for the single active inbound listener
//! - [`LoopbackHub`]: In-process relay connecting several [`LocalChannel`]s

pub mod channel;
pub mod contact;
pub mod conversation;
pub mod error;
pub mod identity;
pub mod local_channel;

// Re-export main types
pub use channel::*;
pub use contact::*;
pub use conversation::*;
pub use error::*;
pub use identity::*;
pub use local_channel::*;
