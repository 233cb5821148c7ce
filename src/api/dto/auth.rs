/*
 * Responsibility
 * - signup / login の request/response DTO
 * - user / session は IdP の形をそのまま返す
 */
use serde::{Deserialize, Serialize};

use crate::services::identity::{Session, User};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Returns `(email, password)` when both are present and non-empty.
    pub fn validate(&self) -> Result<(&str, &str), &'static str> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Ok((email.trim(), password))
            }
            _ => Err("email and password are required"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user: User,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub session: Session,
}
