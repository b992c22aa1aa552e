//! Visitor identity forwarded to the vendor
//!
//! The identity is caller-supplied and never validated beyond "non-blank id".
//! Anonymous visitors get a generated `guest_` identifier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used for generated guest identities
pub const GUEST_DISPLAY_NAME: &str = "Website Visitor";

/// Prefix of generated guest identifiers
pub const GUEST_PREFIX: &str = "guest_";

/// A visitor identity as sent by the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fresh guest identity with a random identifier
    pub fn guest() -> Self {
        Self {
            id: format!("{}{}", GUEST_PREFIX, Uuid::new_v4().simple()),
            name: Some(GUEST_DISPLAY_NAME.to_string()),
        }
    }

    /// Use the provided identity when it carries a non-blank id, else a guest.
    /// A missing or blank name becomes the visitor display name.
    pub fn resolve(provided: Option<UserIdentity>) -> Self {
        match provided {
            Some(user) if !user.id.trim().is_empty() => Self {
                id: user.id.trim().to_string(),
                name: user
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .or_else(|| Some(GUEST_DISPLAY_NAME.to_string())),
            },
            _ => Self::guest(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.id.starts_with(GUEST_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_provided_identity() {
        let user = UserIdentity::resolve(Some(UserIdentity::new("member_7").with_name("Ana")));
        assert_eq!(user.id, "member_7");
        assert_eq!(user.name.as_deref(), Some("Ana"));
        assert!(!user.is_guest());
    }

    #[test]
    fn test_resolve_defaults_missing_name() {
        let provided: UserIdentity = serde_json::from_str(r#"{"id":"member_7"}"#).unwrap();
        let user = UserIdentity::resolve(Some(provided));
        assert_eq!(user.id, "member_7");
        assert_eq!(user.name.as_deref(), Some(GUEST_DISPLAY_NAME));
        assert!(!user.is_guest());
    }

    #[test]
    fn test_resolve_trims_id() {
        let user = UserIdentity::resolve(Some(UserIdentity::new("  member_7 ")));
        assert_eq!(user.id, "member_7");
    }

    #[test]
    fn test_blank_id_falls_back_to_guest() {
        let user = UserIdentity::resolve(Some(UserIdentity::new("   ")));
        assert!(user.is_guest());
        assert_eq!(user.name.as_deref(), Some(GUEST_DISPLAY_NAME));
    }

    #[test]
    fn test_guest_ids_are_unique() {
        let a = UserIdentity::guest();
        let b = UserIdentity::guest();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), GUEST_PREFIX.len() + 32);
    }

    #[test]
    fn test_name_is_optional_on_the_wire() {
        let user: UserIdentity = serde_json::from_str(r#"{"id":"guest_42"}"#).unwrap();
        assert_eq!(user, UserIdentity::new("guest_42"));
        assert_eq!(serde_json::to_string(&user).unwrap(), r#"{"id":"guest_42"}"#);
    }
}
