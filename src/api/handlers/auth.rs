/*
 * Responsibility
 * - POST /api/auth/signup, POST /api/auth/login
 * - 入力チェックだけして IdP にそのまま委譲する (トークン発行はしない)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::auth::{CredentialsRequest, LoginResponse, SignUpResponse},
        extractors::ApiJson,
    },
    error::AppError,
    state::AppState,
};

pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    let (email, password) = req.validate().map_err(AppError::validation)?;

    // IdP の拒否理由 (登録済み、弱いパスワードなど) はそのまま 400 で返す
    let user = state.identity.sign_up(email, password).await?;

    tracing::info!(user_id = %user.id, "user created");

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user,
            message: "user created successfully",
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = req.validate().map_err(AppError::validation)?;

    let session = state
        .identity
        .sign_in_with_password(email, password)
        .await
        .map_err(|err| {
            // 理由はクライアントに返さない
            tracing::warn!(error = %err, "password login rejected");
            AppError::InvalidCredentials
        })?;

    Ok(Json(LoginResponse {
        user: session.user.clone(),
        session,
    }))
}
