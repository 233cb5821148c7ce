//! Bearer gate: `Authorization: Bearer <token>` → IdP で検証 → AuthCtx を extensions に入れる
//!
//! - ヘッダが無い / 形式が違う: IdP を呼ばずに 401 (missing token)
//! - IdP が拒否 / IdP 障害: 401 (invalid token)
//! - 検証結果はキャッシュしない。毎リクエスト IdP に問い合わせる

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// 保護するルートだけに gate を掛ける。
///
/// `route_layer` なので、どのルートにもマッチしないリクエストは 401 ではなく 404 のまま。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Extract the credential from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    let token = auth
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AppError::MissingToken)?;

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    let principal = match state.identity.get_user(token).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                error = %err,
                backend = state.identity.backend_name(),
                "access token verification failed"
            );
            return Err(AppError::InvalidToken);
        }
    };

    tracing::debug!(user_id = %principal.id, "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(principal));

    Ok(next.run(req).await)
}
