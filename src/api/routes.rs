/*
 * Responsibility
 * - /api の URL 構造を定義
 * - 公開: /public/books, /auth/signup, /auth/login
 * - bearer 必須: /books, /books/{book_id} (gate は route_layer で保護範囲にだけ掛ける)
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::handlers::{
    auth::{login, sign_up},
    books::{create_book, delete_book, list_my_books, list_public_books, update_book},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/books", get(list_my_books).post(create_book))
        .route("/books/{book_id}", put(update_book).delete(delete_book));

    Router::new()
        .route("/public/books", get(list_public_books))
        .route("/auth/signup", post(sign_up))
        .route("/auth/login", post(login))
        .merge(access::apply(protected, state))
}
