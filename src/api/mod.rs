/*
 * Responsibility
 * - /api 配下の公開窓口 (routes() の re-export など)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
