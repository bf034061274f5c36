/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が認証サーバーでトークンを検証し、request extensions に格納する
 *
 * Notes
 * - token は RLS 用に data API へそのまま渡す。ログには出さない
 */
use std::fmt;

use uuid::Uuid;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` is the Supabase auth user id (the `user_id` column of owned rows)
/// - `token` is the caller's access token, re-presented to the data API so
///   row-level security evaluates as this user
#[derive(Clone)]
pub struct AuthCtx {
    pub user_id: Uuid,
    token: String,
}

impl AuthCtx {
    pub fn new(user_id: Uuid, token: impl Into<String>) -> Self {
        Self {
            user_id,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// token はログに出さない
impl fmt::Debug for AuthCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCtx")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let ctx = AuthCtx::new(Uuid::nil(), "secret-token");
        let rendered = format!("{ctx:?}");
        assert!(!rendered.contains("secret-token"));
        assert_eq!(ctx.token(), "secret-token");
    }
}
