/*
 * Responsibility
 * - books の型 (Book / NewBook / BookPatch)
 * - 所有者スコープ付き CRUD の trait
 */
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::repos::error::RepoResult;

/// Store-assigned identifier. Kept with its JSON type so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Int(i64),
    Text(String),
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Int(n) => write!(f, "{n}"),
            BookId::Text(s) => f.write_str(s),
        }
    }
}

/// A row as the store returns it.
///
/// Only `id` is required. Rows written outside this API (seeded catalog
/// entries, rows without an owner) still list, and columns not modelled here
/// are kept in `extra` so they go back to the client unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub pages: Option<i64>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    pub fn is_owned_by(&self, owner: Uuid) -> bool {
        self.user_id == Some(owner)
    }
}

/// Insert payload. `user_id` always comes from the principal, never the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    pub user_id: Uuid,
}

/// Partial update.
///
/// Optional columns are tri-state:
/// - None: do not update
/// - Some(None): set NULL
/// - Some(Some(v)): set v
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Option<i64>>,
}

impl BookPatch {
    /// Apply to an in-process copy (the remote store applies the same rules itself).
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = Some(title.clone());
        }
        if let Some(author) = &self.author {
            book.author = Some(author.clone());
        }
        if let Some(year) = self.year {
            book.year = year;
        }
        if let Some(image) = &self.image {
            book.image = image.clone();
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
    }
}

/// Record store for books.
///
/// Every owner-scoped method matches on `(id, user_id)` in a single store call;
/// "not found" and "owned by someone else" are indistinguishable to callers.
#[async_trait]
pub trait BookRepo: Send + Sync + 'static {
    fn backend_name(&self) -> &'static str;

    // Every book regardless of owner (public catalog).
    async fn list_all(&self) -> RepoResult<Vec<Book>>;

    async fn list_by_owner(&self, owner: Uuid) -> RepoResult<Vec<Book>>;

    async fn insert(&self, book: NewBook) -> RepoResult<Book>;

    // Returns None when no row matched `(id, owner)`.
    async fn update_owned(
        &self,
        id: &str,
        owner: Uuid,
        patch: &BookPatch,
    ) -> RepoResult<Option<Book>>;

    // Returns false when no row matched `(id, owner)`.
    async fn delete_owned(&self, id: &str, owner: Uuid) -> RepoResult<bool>;
}
