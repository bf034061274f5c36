//! Supabase REST client: token introspection (GoTrue) and per-user table access (PostgREST).
//!
//! Two handles:
//! - `SupabaseClient`: process-wide, presents only the project's anon key.
//! - `UserClient`: built per request from a verified `AuthCtx`, presents the caller's
//!   access token so the project's row-level security applies to every query.
//!
//! Both share one `reqwest::Client` (connection pool), so building a `UserClient` is cheap.

use std::{fmt, sync::Arc};

use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use crate::api::extractors::AuthCtx;
use crate::services::supabase::SupabaseError;

const APIKEY_HEADER: &str = "apikey";
const PREFER_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

/// The subset of the GoTrue user object this service relies on.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    anon_key: Arc<str>,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(base_url: &Url, anon_key: &str) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.as_str().trim_end_matches('/')),
            anon_key: Arc::from(anon_key),
        })
    }

    /// Resolves an access token to its user.
    ///
    /// - `Ok(Some(_))`: token is valid
    /// - `Ok(None)`: the auth server refused the token (any 4xx)
    /// - `Err(_)`: transport failure, 5xx, or an undecodable body
    pub async fn get_user(&self, token: &str) -> Result<Option<AuthUser>, SupabaseError> {
        let res = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header(APIKEY_HEADER, &*self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = res.status();
        if status.is_client_error() {
            tracing::debug!(%status, "auth server rejected access token");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SupabaseError::from_response(res).await);
        }

        Ok(Some(res.json::<AuthUser>().await?))
    }

    /// Builds a handle that acts as the authenticated caller.
    pub fn for_user(&self, auth: &AuthCtx) -> UserClient {
        UserClient {
            http: self.http.clone(),
            base_url: Arc::clone(&self.base_url),
            anon_key: Arc::clone(&self.anon_key),
            token: auth.token().to_string(),
        }
    }
}

/// Table access scoped to one caller.
///
/// The only way to get one is `SupabaseClient::for_user`, which needs an `AuthCtx`;
/// repositories taking `&UserClient` therefore cannot run unauthenticated.
#[derive(Clone)]
pub struct UserClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    anon_key: Arc<str>,
    token: String,
}

impl fmt::Debug for UserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UserClient {
    pub fn select(&self, table: &str) -> RequestBuilder {
        self.request(Method::GET, table).query(&[("select", "*")])
    }

    pub fn insert(&self, table: &str) -> RequestBuilder {
        self.request(Method::POST, table)
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1)
    }

    pub fn update(&self, table: &str) -> RequestBuilder {
        self.request(Method::PATCH, table)
            .header(PREFER_REPRESENTATION.0, PREFER_REPRESENTATION.1)
    }

    pub fn delete(&self, table: &str) -> RequestBuilder {
        self.request(Method::DELETE, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header(APIKEY_HEADER, &*self.anon_key)
            .bearer_auth(&self.token)
    }
}

/// PostgREST `eq` filter value.
pub fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// PostgREST case-insensitive "contains" filter value.
pub fn ilike_contains(term: &str) -> String {
    format!("ilike.%{term}%")
}

/// Sends the request and decodes the returned row set.
pub async fn rows<T: DeserializeOwned>(req: RequestBuilder) -> Result<Vec<T>, SupabaseError> {
    let res = req.send().await?;
    if !res.status().is_success() {
        return Err(SupabaseError::from_response(res).await);
    }
    Ok(res.json::<Vec<T>>().await?)
}

/// Sends the request, ignoring any body.
pub async fn execute(req: RequestBuilder) -> Result<(), SupabaseError> {
    let res = req.send().await?;
    if !res.status().is_success() {
        return Err(SupabaseError::from_response(res).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client_for(server: &MockServer) -> SupabaseClient {
        let url = Url::parse(&server.uri()).unwrap();
        SupabaseClient::new(&url, "anon-key").unwrap()
    }

    #[tokio::test]
    async fn get_user_resolves_valid_token() {
        let server = MockServer::start().await;
        let user_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": user_id,
                "email": "reader@example.com",
                "aud": "authenticated",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = client_for(&server)
            .await
            .get_user("good")
            .await
            .unwrap()
            .expect("user");
        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn get_user_maps_client_errors_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": 403,
                "error_code": "bad_jwt",
                "msg": "invalid JWT",
            })))
            .mount(&server)
            .await;

        let user = client_for(&server).await.get_user("bad").await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn get_user_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.get_user("any").await.unwrap_err();
        assert!(matches!(err, SupabaseError::Api { status: 503, .. }));
    }

    #[test]
    fn filter_values_use_postgrest_syntax() {
        assert_eq!(eq("42"), "eq.42");
        assert_eq!(ilike_contains("dun"), "ilike.%dun%");
    }
}
