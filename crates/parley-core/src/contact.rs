//! Contacts and the directory used to resolve display names

use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// A known participant with a human-readable name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: UserId,
    pub name: String,
}

impl Contact {
    /// Create a new contact
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Read-only source of contacts, queried for display names
///
/// Implementations return contacts in their own insertion order. Lookups
/// are linear scans; the directory is expected to be small.
pub trait ContactDirectory: Send + Sync {
    /// Snapshot of all known contacts
    fn contacts(&self) -> Vec<Contact>;

    /// Find a contact by id (first match wins)
    fn find(&self, id: &UserId) -> Option<Contact> {
        self.contacts().into_iter().find(|c| &c.id == id)
    }
}

impl ContactDirectory for Vec<Contact> {
    fn contacts(&self) -> Vec<Contact> {
        self.clone()
    }

    fn find(&self, id: &UserId) -> Option<Contact> {
        self.iter().find(|c| &c.id == id).cloned()
    }
}

/// Resolve the display name for an id
///
/// Falls back to the raw id when the contact is unknown or has an empty
/// name. Never fails.
pub fn display_name(contacts: &[Contact], id: &UserId) -> String {
    contacts
        .iter()
        .find(|c| &c.id == id)
        .map(|c| c.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(id.as_str())
        .to_string()
}
