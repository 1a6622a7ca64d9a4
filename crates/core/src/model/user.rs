use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// Name shown when the account carries no usable email.
pub const FALLBACK_DISPLAY_NAME: &str = "Student";

/// Opaque identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    user_id: UserId,
    email: String,
    display_name: String,
}

impl Identity {
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        let email = email.into();
        let display_name = display_name_for(&email);
        Self {
            user_id,
            email,
            display_name,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Local part of an email address, or the fallback name when there is none.
#[must_use]
pub fn display_name_for(email: &str) -> String {
    email
        .split('@')
        .next()
        .map(str::trim)
        .filter(|local| !local.is_empty())
        .map_or_else(|| FALLBACK_DISPLAY_NAME.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_local_part() {
        let identity = Identity::new(UserId::new(4), "ana@example.com");
        assert_eq!(identity.display_name(), "ana");
        assert_eq!(identity.email(), "ana@example.com");
    }

    #[test]
    fn display_name_falls_back() {
        assert_eq!(display_name_for(""), FALLBACK_DISPLAY_NAME);
        assert_eq!(display_name_for("@example.com"), FALLBACK_DISPLAY_NAME);
        assert_eq!(display_name_for("bob"), "bob");
    }
}
