pub mod book_repo;
pub mod error;
