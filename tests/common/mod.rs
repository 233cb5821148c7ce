#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures: in-memory stand-ins for the identity provider and the book
//! store, plus a helper that drives the real router with `oneshot`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use book_catalog::{
    app::build_router,
    config::{AppEnv, Config},
    repos::{
        Book, BookId, BookPatch, BookRepo, NewBook,
        error::{RepoError, RepoResult},
    },
    services::identity::{
        IdentityError, IdentityProvider, IdentityResult, Principal, Session, User,
    },
    services::supabase::UpstreamError,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryIdentity {
    users: Mutex<HashMap<String, (String, User)>>,
    tokens: Mutex<HashMap<String, Principal>>,
    pub get_user_calls: AtomicUsize,
}

impl InMemoryIdentity {
    /// Register a user and hand back a valid bearer token for it.
    pub fn issue(&self, email: &str) -> (Uuid, String) {
        let user = User::new(Uuid::new_v4(), email);
        let token = format!("token-{}", user.id);
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user.principal());
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), ("pw".to_string(), user.clone()));
        (user.id, token)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(IdentityError::Rejected("User already registered".into()));
        }
        if password.len() < 6 {
            return Err(IdentityError::Rejected(
                "Password should be at least 6 characters.".into(),
            ));
        }

        let user = User::new(Uuid::new_v4(), email);
        users.insert(email.to_string(), (password.to_string(), user.clone()));
        Ok(user)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> IdentityResult<Session> {
        let users = self.users.lock().unwrap();
        let (_, user) = users
            .get(email)
            .filter(|(stored, _)| stored == password)
            .ok_or_else(|| IdentityError::Rejected("Invalid login credentials".into()))?;

        let token = format!("token-{}", user.id);
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), user.principal());

        Ok(Session {
            access_token: token,
            token_type: "bearer".into(),
            expires_in: Some(3600),
            expires_at: None,
            refresh_token: Some("refresh".into()),
            user: user.clone(),
            attributes: serde_json::Map::new(),
        })
    }

    async fn get_user(&self, token: &str) -> IdentityResult<Principal> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("invalid JWT".into()))
    }
}

#[derive(Default)]
pub struct InMemoryBooks {
    rows: Mutex<Vec<Book>>,
    next_id: AtomicI64,
    pub mutations: AtomicUsize,
    pub fail_with: Mutex<Option<String>>,
}

impl InMemoryBooks {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Book> {
        self.rows.lock().unwrap().clone()
    }

    /// Put a row in the store as if written by something other than this API.
    pub fn seed(&self, row: Value) -> Book {
        let book: Book = serde_json::from_value(row).unwrap();
        self.rows.lock().unwrap().push(book.clone());
        book
    }

    fn check_failure(&self) -> RepoResult<()> {
        match self.fail_with.lock().unwrap().clone() {
            Some(message) => Err(RepoError::Store(UpstreamError::Rejected {
                status: reqwest::StatusCode::BAD_REQUEST,
                message,
            })),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookRepo for InMemoryBooks {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn list_all(&self) -> RepoResult<Vec<Book>> {
        self.check_failure()?;
        Ok(self.all())
    }

    async fn list_by_owner(&self, owner: Uuid) -> RepoResult<Vec<Book>> {
        self.check_failure()?;
        Ok(self
            .all()
            .into_iter()
            .filter(|b| b.is_owned_by(owner))
            .collect())
    }

    async fn insert(&self, book: NewBook) -> RepoResult<Book> {
        self.check_failure()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = Book {
            id: BookId::Int(id),
            title: Some(book.title),
            author: Some(book.author),
            year: book.year,
            image: book.image,
            pages: book.pages,
            user_id: Some(book.user_id),
            created_at: Some(chrono::Utc::now()),
            extra: serde_json::Map::new(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_owned(
        &self,
        id: &str,
        owner: Uuid,
        patch: &BookPatch,
    ) -> RepoResult<Option<Book>> {
        self.check_failure()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows
            .iter_mut()
            .find(|b| b.id.to_string() == id && b.is_owned_by(owner))
        else {
            return Ok(None);
        };
        patch.apply_to(row);
        Ok(Some(row.clone()))
    }

    async fn delete_owned(&self, id: &str, owner: Uuid) -> RepoResult<bool> {
        self.check_failure()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| !(b.id.to_string() == id && b.is_owned_by(owner)));
        Ok(rows.len() != before)
    }
}

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        supabase_url: url::Url::parse("http://127.0.0.1:54321").unwrap(),
        supabase_service_key: "service-key".into(),
        books_table: "books".into(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub identity: Arc<InMemoryIdentity>,
    pub books: Arc<InMemoryBooks>,
}

impl TestApp {
    pub fn new() -> Self {
        let identity = Arc::new(InMemoryIdentity::default());
        let books = Arc::new(InMemoryBooks::default());
        let state = AppState::new(identity.clone(), books.clone());

        Self {
            router: build_router(state, &test_config()),
            identity,
            books,
        }
    }

    /// Send one request through the full middleware stack.
    /// Returns the status and the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };

        (status, body)
    }
}
