/*
 * Responsibility
 * - Books の request/response DTO
 * - 所有者 (user_id) は body から受け取らない。AuthCtx の user_id だけを使う
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::repos::{Book, BookId, BookPatch, NewBook};

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
    pub image: Option<String>,
    pub pages: Option<i64>,
}

impl CreateBookRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        if !filled(&self.title) || !filled(&self.author) {
            return Err("title and author are required");
        }

        Ok(())
    }

    /// Call after `validate()`.
    pub fn into_new_book(self, owner: Uuid) -> NewBook {
        NewBook {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            year: self.year,
            image: self.image,
            pages: self.pages,
            user_id: owner,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (set NULL)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub pages: Option<Option<i64>>,
}

/// Marks a field that appeared in the body, even as `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateBookRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        if let Some(author) = &self.author
            && author.trim().is_empty()
        {
            return Err("author cannot be empty");
        }
        if self.title.is_none()
            && self.author.is_none()
            && self.year.is_none()
            && self.image.is_none()
            && self.pages.is_none()
        {
            return Err("no fields to update");
        }

        Ok(())
    }

    pub fn into_patch(self) -> BookPatch {
        BookPatch {
            title: self.title,
            author: self.author,
            year: self.year,
            image: self.image,
            pages: self.pages,
        }
    }
}

/// Store row as returned to clients, including columns the API doesn't model.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: BookId,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
    pub image: Option<String>,
    pub pages: Option<i64>,
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year,
            image: book.image,
            pages: book.pages,
            user_id: book.user_id,
            created_at: book.created_at,
            extra: book.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_title_and_author() {
        let missing_author: CreateBookRequest =
            serde_json::from_value(json!({"title": "Dune"})).unwrap();
        assert!(missing_author.validate().is_err());

        let blank_title: CreateBookRequest =
            serde_json::from_value(json!({"title": " ", "author": "Herbert"})).unwrap();
        assert!(blank_title.validate().is_err());

        let ok: CreateBookRequest =
            serde_json::from_value(json!({"title": "Dune", "author": "Herbert"})).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn create_ignores_owner_from_body() {
        let owner = Uuid::new_v4();
        let req: CreateBookRequest = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Herbert",
            "year": -40000,
            "user_id": Uuid::new_v4(),
        }))
        .unwrap();

        let book = req.into_new_book(owner);
        assert_eq!(book.user_id, owner);
        assert_eq!(book.year, Some(-40000));
    }

    #[test]
    fn update_distinguishes_null_from_missing() {
        let req: UpdateBookRequest =
            serde_json::from_value(json!({"image": null, "pages": 500})).unwrap();

        assert!(req.validate().is_ok());
        let patch = req.into_patch();
        assert_eq!(patch.image, Some(None));
        assert_eq!(patch.pages, Some(Some(500)));
        assert_eq!(patch.year, None);
        assert_eq!(patch.title, None);
    }

    #[test]
    fn update_rejects_empty_body_and_blank_title() {
        let empty: UpdateBookRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.validate(), Err("no fields to update"));

        let blank: UpdateBookRequest = serde_json::from_value(json!({"title": ""})).unwrap();
        assert_eq!(blank.validate(), Err("title cannot be empty"));
    }

    #[test]
    fn year_and_pages_must_be_json_integers() {
        for body in [
            json!({"title": "Dune", "author": "Herbert", "year": 1965.0}),
            json!({"title": "Dune", "author": "Herbert", "year": "1965"}),
            json!({"title": "Dune", "author": "Herbert", "pages": 412.5}),
        ] {
            assert!(serde_json::from_value::<CreateBookRequest>(body).is_err());
        }

        assert!(serde_json::from_value::<UpdateBookRequest>(json!({"pages": "412"})).is_err());
        assert!(serde_json::from_value::<UpdateBookRequest>(json!({"year": 1965.5})).is_err());
    }

    #[test]
    fn response_keeps_unmodelled_columns() {
        let book: Book = serde_json::from_value(json!({
            "id": 3,
            "title": "Seeded",
            "author": "Someone",
            "user_id": null,
            "isbn": "9780441013593"
        }))
        .unwrap();

        let out = serde_json::to_value(BookResponse::from(book)).unwrap();
        assert_eq!(out["isbn"], "9780441013593");
        assert_eq!(out["user_id"], Value::Null);
        assert_eq!(out["title"], "Seeded");
    }
}
