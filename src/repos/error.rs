/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

use crate::services::supabase::SupabaseError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("remote store error: {0}")]
    Remote(#[from] SupabaseError),
    #[error("remote store returned no representation for {0}")]
    MissingRepresentation(&'static str),
}
