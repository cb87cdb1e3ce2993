//! Authentication service client
//!
//! The only producer of `SessionContext` values. Refreshing yields a new
//! context; the old one is left untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{EntityId, SessionContext, UserRole};
use validator::Validate;

use super::api::{accepted, ApiClient};
use crate::error::{ConsoleError, ConsoleResult};

/// Login request body
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: EntityId,
    name: String,
    role: UserRole,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct Ack {}

#[derive(Debug, Serialize)]
struct NoQuery {}

/// Client for the remote auth service
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a session
    pub async fn login(&self, credentials: &Credentials) -> ConsoleResult<SessionContext> {
        credentials
            .validate()
            .map_err(|e| ConsoleError::InvalidCredentials(e.to_string()))?;

        let response: AuthResponse =
            accepted(self.api.post("auth/login", credentials, None).await?)?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConsoleError::Decode("login response carries no token".into()))?;

        tracing::info!(user = %response.user.name, "signed in");
        Ok(session_from(response.user, token))
    }

    /// Check the session with the server and return a fresh context.
    ///
    /// The server may rotate the token; otherwise the current one is kept.
    pub async fn refresh(&self, session: &SessionContext) -> ConsoleResult<SessionContext> {
        let response: AuthResponse =
            accepted(self.api.get("auth/verify", &NoQuery {}, Some(session)).await?)?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| session.token().to_string());

        tracing::debug!(user = %response.user.name, "session verified");
        Ok(session_from(response.user, token))
    }

    /// End the session on the server. Consumes the context.
    pub async fn logout(&self, session: SessionContext) -> ConsoleResult<()> {
        let _: Ack = accepted(self.api.post("auth/logout", &NoQuery {}, Some(&session)).await?)?;
        tracing::info!(user = %session.display_name(), "signed out");
        Ok(())
    }
}

fn session_from(user: AuthUser, token: String) -> SessionContext {
    SessionContext::new(user.id, user.name, user.role, token, Utc::now())
}
