//! Bearer access token 検証 → AuthCtx を extensions に入れる
//!
//! - トークンはこのサービスにとって不透明。Supabase auth サーバーに渡して user を解決する
//! - キャッシュしない：保護された request 1 件につき auth サーバーへの往復は必ず 1 回

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

pub const MISSING_HEADER: &str = "Missing Authorization header";
pub const INVALID_HEADER: &str = "Invalid Authorization header";
pub const INVALID_TOKEN: &str = "Invalid token";

/// Puts every route of `router` behind bearer authentication.
///
/// ```ignore
/// let books = api::routes::books();
/// let books = middleware::auth::access::apply(books, state.clone());
/// app = app.nest("/api", books);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: 未定義パスは 401 ではなく 404 のまま
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)?.to_string();

    let user = match state.supabase.get_user(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("access token rejected by auth server");
            return Err(AppError::Unauthorized(INVALID_TOKEN));
        }
        Err(err) => {
            tracing::error!(error = %err, "auth server call failed");
            return Err(AppError::Internal);
        }
    };

    tracing::debug!(user_id = %user.id, "request authenticated");

    // middleware → extractor
    req.extensions_mut()
        .insert(AuthCtx::new(user.id, token));

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Result<&str, AppError> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized(MISSING_HEADER))?;

    if raw.is_empty() {
        return Err(AppError::Unauthorized(MISSING_HEADER));
    }

    let raw = raw
        .to_str()
        .map_err(|_| AppError::Unauthorized(INVALID_HEADER))?;

    let rest = raw
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized(INVALID_HEADER))?;

    // "Bearer " だけなら auth サーバーには問い合わせない
    rest.split(' ')
        .next()
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized(INVALID_TOKEN))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn request_with(header_value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/books");
        if let Some(v) = header_value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn rejection(header_value: Option<&str>) -> &'static str {
        match bearer_token(&request_with(header_value)) {
            Err(AppError::Unauthorized(msg)) => msg,
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn absent_or_empty_header_is_missing() {
        assert_eq!(rejection(None), MISSING_HEADER);
        assert_eq!(rejection(Some("")), MISSING_HEADER);
    }

    #[test]
    fn non_bearer_scheme_is_invalid_header() {
        assert_eq!(rejection(Some("Basic dXNlcjpwdw==")), INVALID_HEADER);
        assert_eq!(rejection(Some("bearer abc")), INVALID_HEADER);
        assert_eq!(rejection(Some("Bearer")), INVALID_HEADER);
    }

    #[test]
    fn non_ascii_header_is_invalid_header() {
        let req = Request::builder()
            .uri("/api/books")
            .header(
                header::AUTHORIZATION,
                HeaderValue::from_bytes(b"Bearer \xfcber").unwrap(),
            )
            .body(Body::empty())
            .unwrap();

        match bearer_token(&req) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_HEADER),
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn empty_token_is_invalid_token() {
        assert_eq!(rejection(Some("Bearer ")), INVALID_TOKEN);
    }

    #[test]
    fn token_is_first_segment_after_scheme() {
        let req = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");

        let req = request_with(Some("Bearer abc trailing"));
        assert_eq!(bearer_token(&req).unwrap(), "abc");
    }
}
