/*
 * Responsibility
 * - handler 向け extractor の公開窓口
 */
pub mod auth_ctx;
pub mod json;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json::ApiJson;
