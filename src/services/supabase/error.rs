use thiserror::Error;

/// Errors talking to the Supabase project (GoTrue auth or PostgREST).
///
/// Kept apart from `AppError` so the caller decides what a failure means
/// (a rejected token is a 401, an unreachable store is a 500).
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("supabase request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("supabase responded {status}: {message}")]
    Api { status: u16, message: String },
}

impl SupabaseError {
    pub(crate) async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let message = res
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Self::Api { status, message }
    }
}
