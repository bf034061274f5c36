/*
 * Responsibility
 * - PostgREST 経由の books テーブル操作
 * - 全関数が UserClient を受け取る → 所有者チェックは呼び出しユーザーとしての RLS に任せる (ここでは再チェックしない)
 * - 行はストアが返した JSON をそのまま保持する (型を絞らない)
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::supabase::{
    UserClient,
    client::{self as rest, eq, ilike_contains},
};

const TABLE: &str = "books";

/// One `books` row exactly as the store returned it.
///
/// Columns (`id`, `title`, `author`, `status`, `user_id`, `created_at`, ...) are not
/// re-typed, so a schema drift or an odd timestamp format reaches the client unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookRow(pub Map<String, Value>);

impl BookRow {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }
}

#[derive(Debug, Serialize)]
pub struct NewBook<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub status: &'a str,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
struct StatusPatch<'a> {
    status: &'a str,
}

/// Caller's books, newest first, optionally narrowed to titles containing `search`.
pub async fn list(db: &UserClient, search: Option<&str>) -> Result<Vec<BookRow>, RepoError> {
    let mut req = db.select(TABLE).query(&[("order", "created_at.desc")]);

    if let Some(term) = search.filter(|t| !t.is_empty()) {
        req = req.query(&[("title", ilike_contains(term))]);
    }

    let rows = rest::rows::<BookRow>(req).await?;
    tracing::debug!(count = rows.len(), searched = search.is_some(), "listed books");

    Ok(rows)
}

pub async fn create(db: &UserClient, book: &NewBook<'_>) -> Result<BookRow, RepoError> {
    let rows = rest::rows::<BookRow>(db.insert(TABLE).json(book)).await?;

    rows.into_iter()
        .next()
        .ok_or(RepoError::MissingRepresentation("insert"))
}

/// `Ok(None)` when no visible row has `book_id` (unknown id, or owned by someone else).
pub async fn update_status(
    db: &UserClient,
    book_id: &str,
    status: &str,
) -> Result<Option<BookRow>, RepoError> {
    let req = db
        .update(TABLE)
        .query(&[("id", eq(book_id))])
        .json(&StatusPatch { status });

    let row = rest::rows::<BookRow>(req).await?.into_iter().next();

    Ok(row)
}

/// Deleting a row that is absent or not visible to the caller is not an error.
pub async fn delete(db: &UserClient, book_id: &str) -> Result<(), RepoError> {
    rest::execute(db.delete(TABLE).query(&[("id", eq(book_id))])).await?;

    Ok(())
}
