//! Authenticated session context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Console roles as reported by the auth service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Warehouse,
    Dispatcher,
    #[serde(other)]
    Viewer,
}

/// Immutable credentials for one signed-in user.
///
/// Only the auth client creates these. A refresh produces a new value
/// rather than mutating the existing one.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    user_id: EntityId,
    display_name: String,
    role: UserRole,
    token: String,
    issued_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(
        user_id: EntityId,
        display_name: String,
        role: UserRole,
        token: String,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            display_name,
            role,
            token,
            issued_at,
        }
    }

    pub fn user_id(&self) -> &EntityId {
        &self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> &UserRole {
        &self.role
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

// Keep bearer tokens out of logs
impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = SessionContext::new(
            EntityId::from(7),
            "Ana".to_string(),
            UserRole::Warehouse,
            "secret-token".to_string(),
            Utc::now(),
        );
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_unknown_role_falls_back_to_viewer() {
        let role: UserRole = serde_json::from_str("\"accountant\"").unwrap();
        assert_eq!(role, UserRole::Viewer);
    }
}
