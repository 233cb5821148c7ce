//! Shared HTTP plumbing for the Supabase project this API proxies to.
//!
//! Both upstream adapters (GoTrue identity, PostgREST records) go through one
//! `SupabaseClient` so they share the connection pool and the service key.
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Failure talking to the Supabase project.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Supabase answered with a non-2xx status. `message` is the best human
    /// readable text found in the error body.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
    #[error("unexpected upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Cheap to clone (`reqwest::Client` is an `Arc` inside).
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    service_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // service_key は出さない
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(base_url: Url, service_key: impl Into<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(http, base_url, service_key))
    }

    pub fn with_http(
        http: reqwest::Client,
        mut base_url: Url,
        service_key: impl Into<String>,
    ) -> Self {
        // Url::join drops the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            http,
            base_url,
            service_key: service_key.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path such as `auth/v1/user` against the project URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Request authenticated as the service role.
    pub fn service_request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Request authenticated as an end user (the project key still goes in `apikey`).
    pub fn user_request(
        &self,
        method: reqwest::Method,
        url: Url,
        user_token: &str,
    ) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(user_token)
    }
}

/// Send `request` and decode a 2xx JSON body into `T`.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::Rejected {
            status,
            message: upstream_message(status, &body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull a readable message out of a GoTrue or PostgREST error body.
///
/// GoTrue uses `msg` / `error_description` / `error`, PostgREST uses `message`.
pub fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(serde_json::Value::String(s)) = map.get(key)
                && !s.trim().is_empty()
            {
                return s.clone();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("upstream returned {}", status.as_u16()))
}
