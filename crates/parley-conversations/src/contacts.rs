//! Persisted contact list
//!
//! The contact book is the [`ContactDirectory`] the conversation store
//! reads names from. It is loaded from storage on open and written back
//! after every change.

use std::sync::Arc;

use parking_lot::RwLock;
use parley_core::{Contact, ContactDirectory, UserId};
use parley_storage::{KeyValueStore, load_or_default, save};
use tracing::debug;

use crate::CONTACTS_KEY;
use crate::error::ConversationResult;

/// Contacts stored under [`CONTACTS_KEY`]
pub struct ContactBook {
    storage: Arc<dyn KeyValueStore>,
    contacts: RwLock<Vec<Contact>>,
}

impl ContactBook {
    /// Load the contact book, starting empty if nothing usable is stored
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let contacts: Vec<Contact> = load_or_default(&*storage, CONTACTS_KEY);
        debug!(count = contacts.len(), "Loaded contacts");
        Self {
            storage,
            contacts: RwLock::new(contacts),
        }
    }

    /// Append a contact
    ///
    /// Ids are not deduplicated; name lookups use the first match. The
    /// write lock is held until the list is saved, so saves reach storage
    /// in the same order as the changes they record.
    pub fn create_contact(&self, id: UserId, name: impl Into<String>) -> ConversationResult<()> {
        let name = name.into();
        debug!(id = %id, name = %name, "Creating contact");

        let mut contacts = self.contacts.write();
        contacts.push(Contact { id, name });
        save(&*self.storage, CONTACTS_KEY, &*contacts)?;
        Ok(())
    }

    /// Number of contacts
    pub fn len(&self) -> usize {
        self.contacts.read().len()
    }

    /// Whether the book is empty
    pub fn is_empty(&self) -> bool {
        self.contacts.read().is_empty()
    }
}

impl ContactDirectory for ContactBook {
    fn contacts(&self) -> Vec<Contact> {
        self.contacts.read().clone()
    }

    fn find(&self, id: &UserId) -> Option<Contact> {
        self.contacts.read().iter().find(|c| &c.id == id).cloned()
    }
}
