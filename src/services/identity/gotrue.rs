//! Supabase Auth (GoTrue) backed identity provider.
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::services::identity::provider::{
    IdentityError, IdentityProvider, IdentityResult, Principal, Session, User,
};
use crate::services::supabase::{SupabaseClient, send_json};

#[derive(Clone, Debug)]
pub struct GoTrueIdentity {
    client: SupabaseClient,
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// `/signup` answers with a session when autoconfirm is on and a bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    WithSession { user: User },
    Bare(User),
}

impl GoTrueIdentity {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for GoTrueIdentity {
    fn backend_name(&self) -> &'static str {
        "supabase-auth"
    }

    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<User> {
        let url = self.client.endpoint("auth/v1/signup")?;
        let request = self
            .client
            .service_request(Method::POST, url)
            .json(&PasswordCredentials { email, password });

        let user = match send_json::<SignUpResponse>(request).await? {
            SignUpResponse::WithSession { user } | SignUpResponse::Bare(user) => user,
        };

        tracing::debug!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .client
            .service_request(Method::POST, url)
            .json(&PasswordCredentials { email, password });

        let session: Session = send_json(request).await?;
        if session.access_token.trim().is_empty() {
            return Err(IdentityError::Rejected(
                "provider returned an empty access token".into(),
            ));
        }

        Ok(session)
    }

    async fn get_user(&self, token: &str) -> IdentityResult<Principal> {
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self.client.user_request(Method::GET, url, token);

        let user: User = send_json(request).await?;
        Ok(user.principal())
    }
}
