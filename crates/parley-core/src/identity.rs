//! User identity
//!
//! Every participant, including the local user, is identified by an
//! opaque string. Ids are compared and ordered lexicographically; that
//! total order is what recipient-set matching sorts by.

use std::borrow::Borrow;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Identity of a chat participant
///
/// Serialized transparently as a plain string so persisted conversations
/// read as `{"recipients": ["u2"], ...}`.
#[derive(
    Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct UserId(String);

impl UserId {
    /// Create a new identity
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse user input into an identity, rejecting blank strings
    pub fn parse(input: &str) -> Result<Self, IdentityError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(IdentityError::InvalidFormat(format!(
                "identity contains whitespace: {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UserId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UserId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Build a list of ids from string slices
pub fn user_ids<I, S>(ids: I) -> Vec<UserId>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(UserId::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_input() {
        let id = UserId::parse("  alice ").unwrap();
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(UserId::parse("   "), Err(IdentityError::Empty));
        assert!(matches!(
            UserId::parse("a b"),
            Err(IdentityError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids = user_ids(["u10", "u2", "u1"]);
        ids.sort();
        assert_eq!(ids, user_ids(["u1", "u10", "u2"]));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::new("u1")).unwrap();
        assert_eq!(json, "\"u1\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "u1");
    }
}
