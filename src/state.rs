/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - identity: 外部 IdP (GoTrue) / books: 外部ストア (PostgREST)
 * - Clone 前提で持つ (内部は Arc なので Clone cheap)
 */
use std::sync::Arc;

use crate::repos::BookRepo;
use crate::services::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub books: Arc<dyn BookRepo>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>, books: Arc<dyn BookRepo>) -> Self {
        Self { identity, books }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("identity", &self.identity.backend_name())
            .field("books", &self.books.backend_name())
            .finish()
    }
}
