/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - gate (middleware/auth/access) が IdP で検証して request extensions に格納する
 */
use uuid::Uuid;

use crate::services::identity::Principal;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は IdP 上のユーザー ID。books の所有者キーとしてのみ使う
/// - `email` はログ相関用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl From<Principal> for AuthCtx {
    fn from(principal: Principal) -> Self {
        Self {
            user_id: principal.id,
            email: principal.email,
        }
    }
}
