/*
 * Responsibility
 * - /api/books 系 CRUD handler
 * - 各 handler は検証済みの AuthCtx から UserClient を毎回作る
 *   → リモート側の RLS がクエリを呼び出しユーザーに絞る
 * - create の user_id は必ず AuthCtx から取る (body の値は信用しない)
 */
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};

use crate::{
    api::{
        dto::books::{
            BookListResponse, BookResponse, CreateBookRequest, DeleteBookResponse, ListBooksQuery,
            UpdateStatusRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::book_repo::{self, NewBook},
    state::AppState,
};

pub async fn list_books(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Query(query): Query<ListBooksQuery>,
) -> Result<Json<BookListResponse>, AppError> {
    let db = state.supabase.for_user(&auth);

    let rows = book_repo::list(&db, query.search.as_deref()).await?;

    let books: Vec<BookResponse> = rows.into_iter().map(BookResponse::from).collect();
    Ok(Json(BookListResponse {
        total: books.len(),
        books,
    }))
}

pub async fn create_book(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let new_book = NewBook {
        title: req.title.as_deref().unwrap_or_default(),
        author: req.author.as_deref(),
        status: req.status_or_default(),
        user_id: auth.user_id,
    };

    let db = state.supabase.for_user(&auth);
    let row = book_repo::create(&db, &new_book).await?;

    tracing::info!(user_id = %auth.user_id, book_id = ?row.id(), "book created");
    Ok(Json(row.into()))
}

pub async fn update_book_status(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(book_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let Json(req) = payload?;
    let status = req
        .validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let db = state.supabase.for_user(&auth);

    // 空 = 存在しない id か、RLS でこのユーザーから見えない行
    let row = book_repo::update_status(&db, &book_id, status)
        .await?
        .ok_or(AppError::not_found("book"))?;

    Ok(Json(row.into()))
}

pub async fn delete_book(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(book_id): Path<String>,
) -> Result<Json<DeleteBookResponse>, AppError> {
    let db = state.supabase.for_user(&auth);

    book_repo::delete(&db, &book_id).await?;

    Ok(Json(DeleteBookResponse { success: true }))
}
