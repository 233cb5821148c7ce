//! Identity provider interface used by the auth handlers and the bearer gate.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::services::supabase::UpstreamError;

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-layer errors.
///
/// Kept apart from `AppError` so each caller decides the status:
/// signup surfaces the message, login and the gate collapse it into 401.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("{0}")]
    Rejected(String),
}

/// Authenticated identity attached to a request by the gate.
///
/// Only `id` is used for authorization (it is the owner key of every book).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: Option<String>,
}

/// The provider's user object. Attributes we don't model are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
            attributes: serde_json::Map::new(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Session returned by a password login; `access_token` is the bearer credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: User,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// External identity provider.
///
/// Implementations hold no per-request state; every `get_user` call is
/// verified by the provider again (no caching of results).
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<User>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session>;

    // Resolve a bearer credential into the principal it belongs to.
    async fn get_user(&self, token: &str) -> IdentityResult<Principal>;
}
