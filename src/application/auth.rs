use crate::domain::auth::{AuthError, LoginGrant};
use crate::domain::ports::SessionStoreRef;
use crate::infrastructure::auth::DemoCredentials;
use tracing::info;

/// Checks credentials and issues session tokens.
pub struct Authenticator {
    credentials: DemoCredentials,
    sessions: SessionStoreRef,
}

impl Authenticator {
    pub fn new(credentials: DemoCredentials, sessions: SessionStoreRef) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let role = self
            .credentials
            .verify(username, password)
            .ok_or(AuthError::InvalidCredentials)?;
        let token = self.sessions.issue(username, role).await;
        info!(username, ?role, "login succeeded");
        Ok(LoginGrant {
            token,
            role,
            username: username.to_string(),
        })
    }
}
