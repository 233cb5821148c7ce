/*
 * Responsibility
 * - 外部サービス (Supabase) との接続を閉じ込める
 * - handler からは trait (IdentityProvider) 越しに使う
 */
pub mod identity;
pub mod supabase;
