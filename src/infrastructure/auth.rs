use crate::domain::auth::{Role, Session};
use crate::domain::ports::{AuthProvider, SessionStore, SessionStoreRef};
use async_trait::async_trait;
use chrono::Utc;
use rand::RngCore;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// The fixed demo accounts: `user/userpass` and `host/hostpass`.
#[derive(Debug, Clone)]
pub struct DemoCredentials {
    accounts: Vec<(String, String, Role)>,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self {
            accounts: vec![
                ("user".to_string(), "userpass".to_string(), Role::User),
                ("host".to_string(), "hostpass".to_string(), Role::Host),
            ],
        }
    }
}

impl DemoCredentials {
    pub fn verify(&self, username: &str, password: &str) -> Option<Role> {
        self.accounts
            .iter()
            .find(|(u, p, _)| u == username && p == password)
            .map(|(_, _, role)| *role)
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Session tokens held in memory with a fixed time-to-live.
///
/// Expired sessions are dropped the first time they are resolved.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, session: &Session) -> bool {
        let age = Utc::now().signed_duration_since(session.issued_at);
        age.to_std().is_ok_and(|age| age >= self.ttl)
    }

    /// Drops every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session));
        before - sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn issue(&self, username: &str, role: Role) -> String {
        let token = generate_token();
        let session = Session {
            username: username.to_string(),
            role,
            issued_at: Utc::now(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    async fn resolve(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if self.is_expired(&session) {
            self.sessions.write().await.remove(token);
            return None;
        }
        Some(session)
    }
}

/// Resolves the role of a request carrying an optional bearer token.
pub struct SessionAuth {
    sessions: SessionStoreRef,
    token: Option<String>,
}

impl SessionAuth {
    pub fn new(sessions: SessionStoreRef, token: Option<String>) -> Self {
        Self { sessions, token }
    }

    /// Builds from an `Authorization` header value; anything but `Bearer <token>` is anonymous.
    pub fn from_header(sessions: SessionStoreRef, header: Option<&str>) -> Self {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);
        Self::new(sessions, token)
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    async fn current_role(&self) -> Role {
        match &self.token {
            Some(token) => self
                .sessions
                .resolve(token)
                .await
                .map_or(Role::None, |session| session.role),
            None => Role::None,
        }
    }
}

/// An `AuthProvider` that always reports the same role.
#[derive(Debug, Clone, Copy)]
pub struct StaticRole(pub Role);

#[async_trait]
impl AuthProvider for StaticRole {
    async fn current_role(&self) -> Role {
        self.0
    }
}
