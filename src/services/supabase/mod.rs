pub mod client;
pub mod error;

pub use client::{SupabaseClient, UserClient};
pub use error::SupabaseError;
