/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

use crate::services::supabase::UpstreamError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Store(#[from] UpstreamError),
    #[error("store returned no row for {0}")]
    NoRowReturned(&'static str),
}

pub type RepoResult<T> = Result<T, RepoError>;
