/*
 * Responsibility
 * - /api/public/books (公開一覧) と /api/books 系 CRUD handler
 * - /api/books 系は gate を通った AuthCtx の user_id で必ずスコープする
 * - 0 行一致は「存在しない」と「他人の本」を区別せず 404 を返す
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::{
        dto::books::{BookResponse, CreateBookRequest, UpdateBookRequest},
        extractors::{ApiJson, AuthCtxExtractor},
    },
    error::AppError,
    repos::Book,
    state::AppState,
};

const RESOURCE: &str = "book";

fn to_responses(books: Vec<Book>) -> Vec<BookResponse> {
    books.into_iter().map(BookResponse::from).collect()
}

pub async fn list_public_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookResponse>>, AppError> {
    let books = state.books.list_all().await?;
    Ok(Json(to_responses(books)))
}

pub async fn list_my_books(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<Vec<BookResponse>>, AppError> {
    let books = state.books.list_by_owner(auth.user_id).await?;
    Ok(Json(to_responses(books)))
}

pub async fn create_book(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    ApiJson(req): ApiJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let book = state
        .books
        .insert(req.into_new_book(auth.user_id))
        .await?;

    tracing::debug!(user_id = %auth.user_id, book_id = %book.id, "book created");

    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn update_book(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(book_id): Path<String>,
    ApiJson(req): ApiJson<UpdateBookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    req.validate().map_err(AppError::validation)?;

    let book = state
        .books
        .update_owned(&book_id, auth.user_id, &req.into_patch())
        .await?
        .ok_or(AppError::not_found_or_forbidden(RESOURCE))?;

    Ok(Json(book.into()))
}

pub async fn delete_book(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(book_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = state.books.delete_owned(&book_id, auth.user_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found_or_forbidden(RESOURCE))
    }
}
