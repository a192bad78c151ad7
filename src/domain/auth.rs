use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access level of the caller.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Host,
    #[default]
    None,
}

/// An issued login session.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

/// The caller's role is not allowed to perform the operation.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum AccessError {
    #[error("forbidden")]
    Forbidden,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum AuthError {
    #[error("username and password required")]
    MissingCredentials,
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Token handed back after a successful login.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub role: Role,
    pub username: String,
}
