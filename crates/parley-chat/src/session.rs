//! Session: one logged-in identity with its contacts and conversations.
//!
//! The local identity lives in storage under [`ID_KEY`]. Without it there
//! is no session; [`Session::login`] stores it and opens one.

use std::sync::Arc;

use parley_conversations::{ContactBook, ConversationResult, ConversationStore, ID_KEY};
use parley_core::{MessageChannel, UserId};
use parley_storage::{KeyValueStore, load_or_default, save};
use tracing::info;

/// A logged-in user's client state
pub struct Session {
    contacts: Arc<ContactBook>,
    conversations: ConversationStore,
}

impl Session {
    /// Identity stored from a previous login, if any
    pub fn stored_identity(storage: &dyn KeyValueStore) -> Option<UserId> {
        load_or_default::<Option<UserId>>(storage, ID_KEY)
    }

    /// Resume the stored identity's session
    ///
    /// Returns `None` when nobody has logged in yet.
    pub fn resume(storage: Arc<dyn KeyValueStore>) -> Option<Self> {
        let id = Self::stored_identity(&*storage)?;
        Some(Self::open(storage, id))
    }

    /// Store `id` as the local identity and open its session
    ///
    /// The id is trimmed; a blank id is rejected and nothing is stored.
    pub fn login(storage: Arc<dyn KeyValueStore>, id: &str) -> ConversationResult<Self> {
        let id = UserId::parse(id)?;
        save(&*storage, ID_KEY, &id)?;
        info!(id = %id, "Logged in");
        Ok(Self::open(storage, id))
    }

    /// Forget the stored identity; contacts and conversations are kept
    pub fn logout(storage: &dyn KeyValueStore) -> ConversationResult<bool> {
        Ok(storage.remove(ID_KEY)?)
    }

    fn open(storage: Arc<dyn KeyValueStore>, id: UserId) -> Self {
        let contacts = Arc::new(ContactBook::open(storage.clone()));
        let conversations = ConversationStore::open(id, storage, contacts.clone());
        Self {
            contacts,
            conversations,
        }
    }

    /// Our identity
    pub fn self_id(&self) -> &UserId {
        self.conversations.self_id()
    }

    /// The contact book
    pub fn contacts(&self) -> &ContactBook {
        &self.contacts
    }

    /// The conversation store
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Mutable access to the conversation store
    pub fn conversations_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversations
    }

    /// Connect the session to a message channel
    pub fn connect(&mut self, channel: Arc<dyn MessageChannel>) {
        self.conversations.attach_channel(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_conversations::ConversationError;
    use parley_core::{IdentityError, LoopbackHub, user_ids};
    use parley_storage::{FileStore, InMemoryStore};
    use tempfile::TempDir;

    fn storage() -> Arc<dyn KeyValueStore> {
        Arc::new(InMemoryStore::new())
    }

    #[test]
    fn test_no_session_before_login() {
        let storage = storage();
        assert!(Session::stored_identity(&*storage).is_none());
        assert!(Session::resume(storage).is_none());
    }

    #[test]
    fn test_login_then_resume() {
        let storage = storage();
        let session = Session::login(storage.clone(), "u1").unwrap();
        assert_eq!(session.self_id(), &UserId::new("u1"));

        let resumed = Session::resume(storage).unwrap();
        assert_eq!(resumed.self_id(), &UserId::new("u1"));
    }

    #[test]
    fn test_blank_login_rejected() {
        let storage = storage();
        let result = Session::login(storage.clone(), "   ");
        assert!(matches!(
            result,
            Err(ConversationError::Identity(IdentityError::Empty))
        ));
        assert!(Session::stored_identity(&*storage).is_none());
    }

    #[test]
    fn test_login_trims_id() {
        let session = Session::login(storage(), "  u1 ").unwrap();
        assert_eq!(session.self_id(), &UserId::new("u1"));
    }

    #[test]
    fn test_identity_survives_restart_on_disk() {
        let temp = TempDir::new().unwrap();
        {
            let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(temp.path()).unwrap());
            let mut session = Session::login(storage, "u1").unwrap();
            session
                .conversations_mut()
                .send_message(user_ids(["u2"]), "before restart")
                .unwrap();
        }

        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(temp.path()).unwrap());
        let session = Session::resume(storage).unwrap();
        assert_eq!(session.self_id(), &UserId::new("u1"));
        assert_eq!(
            session.conversations().conversations()[0].messages[0].text,
            "before restart"
        );
    }

    #[test]
    fn test_logout_keeps_conversations() {
        let storage = storage();
        let mut session = Session::login(storage.clone(), "u1").unwrap();
        session
            .conversations_mut()
            .create_conversation(user_ids(["u2"]))
            .unwrap();

        assert!(Session::logout(&*storage).unwrap());
        assert!(Session::resume(storage.clone()).is_none());

        let again = Session::login(storage, "u1").unwrap();
        assert_eq!(again.conversations().conversations().len(), 1);
    }

    #[test]
    fn test_contacts_feed_projection() {
        let mut session = Session::login(storage(), "u1").unwrap();
        session.contacts().create_contact(UserId::new("u2"), "Bob").unwrap();
        session
            .conversations_mut()
            .send_message(user_ids(["u2"]), "hi")
            .unwrap();

        let selected = session.conversations().selected_conversation().unwrap();
        assert_eq!(selected.title(), "Bob");
    }

    #[test]
    fn test_connected_sessions_exchange_messages() {
        let hub = LoopbackHub::new();
        let mut alice = Session::login(storage(), "alice").unwrap();
        let mut bob = Session::login(storage(), "bob").unwrap();
        alice.connect(hub.connect(UserId::new("alice")));
        bob.connect(hub.connect(UserId::new("bob")));

        alice
            .conversations_mut()
            .send_message(user_ids(["bob"]), "ping")
            .unwrap();
        assert_eq!(bob.conversations_mut().process_inbound().unwrap(), 1);
        assert_eq!(bob.conversations().conversations()[0].recipients, user_ids(["alice"]));
    }
}
