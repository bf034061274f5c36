/*
 * Responsibility
 * - Books の request/response DTO
 * - 必須項目の validate() (insert/update 失敗ではなく 400 にする)
 * - response はストアが返した行をそのまま返す (再整形しない)
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::repos::book_repo::BookRow;

pub const DEFAULT_STATUS: &str = "Reading";

#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    pub search: Option<String>,
}

// Unknown fields (including a client-supplied `user_id`) are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
}

impl CreateBookRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.title {
            Some(title) if !title.trim().is_empty() => Ok(()),
            _ => Err("title is required"),
        }
    }

    /// `status` absent or null falls back to the default shelf.
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    pub fn validate(&self) -> Result<&str, &'static str> {
        match self.status.as_deref() {
            Some(status) if !status.trim().is_empty() => Ok(status),
            _ => Err("status is required"),
        }
    }
}

/// The stored row, column for column.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BookResponse(pub Map<String, Value>);

impl From<BookRow> for BookResponse {
    fn from(row: BookRow) -> Self {
        Self(row.0)
    }
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub total: usize,
    pub books: Vec<BookResponse>,
}

#[derive(Debug, Serialize)]
pub struct DeleteBookResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_non_blank_title() {
        let req: CreateBookRequest = serde_json::from_str(r#"{"author": "Herbert"}"#).unwrap();
        assert_eq!(req.validate(), Err("title is required"));

        let req: CreateBookRequest = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert_eq!(req.validate(), Err("title is required"));
    }

    #[test]
    fn create_defaults_status_to_reading() {
        let req: CreateBookRequest =
            serde_json::from_str(r#"{"title": "Dune", "status": null, "user_id": "x"}"#).unwrap();
        assert_eq!(req.validate(), Ok(()));
        assert_eq!(req.status_or_default(), "Reading");
        assert!(req.author.is_none());
    }

    #[test]
    fn update_requires_status() {
        let req: UpdateStatusRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.validate(), Err("status is required"));

        let req: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "Completed"}"#).unwrap();
        assert_eq!(req.validate(), Ok("Completed"));
    }
}
