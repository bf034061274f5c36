/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - ここの route はすべて Bearer 認証 middleware (route_layer) の後ろに置く
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::{
    api::handlers::books::{create_book, delete_book, list_books, update_book_status},
    middleware,
    state::AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let books = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{book_id}",
            patch(update_book_status).delete(delete_book),
        );

    middleware::auth::access::apply(books, state)
}
