/*
 * Responsibility
 * - books の永続化 (外部ストア越し)
 * - handler は BookRepo trait だけを見る
 */
pub mod book_repo;
pub mod error;
pub mod postgrest;

pub use book_repo::{Book, BookId, BookPatch, BookRepo, NewBook};
pub use postgrest::PostgrestBookRepo;
