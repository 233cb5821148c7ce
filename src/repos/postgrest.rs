/*
 * Responsibility
 * - books テーブル向け PostgREST (Supabase /rest/v1) 操作
 * - 所有者スコープは eq フィルタ (id, user_id) で 1 リクエストにまとめる
 * - update/delete は return=representation で影響行を受け取り、0 行を判定する
 */
use async_trait::async_trait;
use reqwest::Method;
use url::Url;
use uuid::Uuid;

use crate::repos::book_repo::{Book, BookPatch, BookRepo, NewBook};
use crate::repos::error::{RepoError, RepoResult};
use crate::services::supabase::{SupabaseClient, send_json};

const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Clone, Debug)]
pub struct PostgrestBookRepo {
    client: SupabaseClient,
    table: String,
}

impl PostgrestBookRepo {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn table_url(&self, filters: &[(&str, String)]) -> RepoResult<Url> {
        let mut url = self.client.endpoint(&format!("rest/v1/{}", self.table))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            for (column, value) in filters {
                query.append_pair(column, &format!("eq.{value}"));
            }
        }
        Ok(url)
    }

    fn owned_filters(id: &str, owner: Uuid) -> [(&'static str, String); 2] {
        [("id", id.to_string()), ("user_id", owner.to_string())]
    }
}

#[async_trait]
impl BookRepo for PostgrestBookRepo {
    fn backend_name(&self) -> &'static str {
        "postgrest"
    }

    async fn list_all(&self) -> RepoResult<Vec<Book>> {
        let url = self.table_url(&[])?;
        let rows: Vec<Book> = send_json(self.client.service_request(Method::GET, url)).await?;
        Ok(rows)
    }

    async fn list_by_owner(&self, owner: Uuid) -> RepoResult<Vec<Book>> {
        let url = self.table_url(&[("user_id", owner.to_string())])?;
        let rows: Vec<Book> = send_json(self.client.service_request(Method::GET, url)).await?;
        Ok(rows)
    }

    async fn insert(&self, book: NewBook) -> RepoResult<Book> {
        let url = self.table_url(&[])?;
        let request = self
            .client
            .service_request(Method::POST, url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&book);

        let rows: Vec<Book> = send_json(request).await?;
        rows.into_iter()
            .next()
            .ok_or(RepoError::NoRowReturned("insert"))
    }

    async fn update_owned(
        &self,
        id: &str,
        owner: Uuid,
        patch: &BookPatch,
    ) -> RepoResult<Option<Book>> {
        let url = self.table_url(&Self::owned_filters(id, owner))?;
        let request = self
            .client
            .service_request(Method::PATCH, url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);

        let rows: Vec<Book> = send_json(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_owned(&self, id: &str, owner: Uuid) -> RepoResult<bool> {
        let url = self.table_url(&Self::owned_filters(id, owner))?;
        let request = self
            .client
            .service_request(Method::DELETE, url)
            .header("Prefer", RETURN_REPRESENTATION);

        // 削除済みの行は数えるだけ。形は問わない
        let rows: Vec<serde_json::Value> = send_json(request).await?;
        Ok(!rows.is_empty())
    }
}
