//! CORS policy for the browser client.
//!
//! The single-page app calls this API with an `Authorization` header from its own
//! origin, so the policy is an exact-match origin allowlist with credentials.
//! Methods and request headers are mirrored from the preflight, which is the
//! credentials-compatible form of "allow all".

use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Config;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Never combine a wildcard origin with `allow_credentials(true)`; `*` entries are dropped.
pub fn apply(router: Router, config: &Config) -> Router {
    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter(|s| s.as_str() != "*")
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if allowed.is_empty() {
        // No allowlist means no CORS headers: browsers on other origins are refused.
        tracing::warn!(env = ?config.app_env, "no CORS origins configured");
    } else {
        tracing::info!(origins = ?config.cors_allowed_origins, "CORS allowlist");
    }

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 10));

    router.layer(cors)
}
