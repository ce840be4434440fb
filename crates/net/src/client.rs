//! HTTP client for the STREAMIA backend
//!
//! Wraps [`reqwest`] with the uniform request/response envelope: JSON
//! content type, bearer token from the [`TokenStore`], and status-code
//! mapping into user-facing messages. Nothing is retried.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use streamia_core::TokenStore;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::response::{error_message, ApiResponse};

/// Default timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client bound to one backend and one token store
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .finish()
    }
}

/// Trim whitespace and trailing slashes, and add `http://` when no scheme is given
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

impl ApiClient {
    /// Create a client with the default timeout
    pub fn new(base_url: &str, tokens: TokenStore) -> Result<Self> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout
    pub fn with_timeout(base_url: &str, tokens: TokenStore, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, tokens))
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    pub fn with_client(client: Client, base_url: &str, tokens: TokenStore) -> Self {
        let base_url = normalize_base_url(base_url);
        info!(base_url = %base_url, "Creating API client");
        Self {
            client,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Build a full URL from an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.execute(self.request(Method::GET, endpoint)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.execute(self.request(Method::DELETE, endpoint)).await
    }

    pub(crate) async fn post<T, B>(&self, endpoint: &str, body: Option<&B>) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(Method::POST, endpoint);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder).await
    }

    pub(crate) async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, endpoint).json(body))
            .await
    }

    /// Build a request with JSON content type and, when signed in, the bearer token
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json");

        match self.tokens.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResponse<T> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request failed before a response arrived");
                return ApiResponse::network_error();
            }
        };

        let status = response.status();
        let url = response.url().path().to_string();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, path = %url, "Failed to read response body");
                return ApiResponse::network_error();
            }
        };

        if !status.is_success() {
            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            if status == reqwest::StatusCode::UNAUTHORIZED {
                info!(path = %url, "Session rejected by backend, discarding token");
                if let Err(e) = self.tokens.clear() {
                    warn!(error = %e, "Failed to discard session token");
                }
            }
            let message = error_message(status, &body);
            debug!(path = %url, status = status.as_u16(), message = %message, "Request failed");
            return ApiResponse::failure(Some(status.as_u16()), message);
        }

        let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        match serde_json::from_slice::<T>(payload) {
            Ok(data) => ApiResponse::ok(status.as_u16(), data),
            Err(e) => {
                warn!(error = %e, path = %url, "Unexpected response body");
                ApiResponse::failure(
                    Some(status.as_u16()),
                    format!("Respuesta inválida del servidor: {}", e),
                )
            }
        }
    }

    /// Probe `GET /health`. Any failure, including a timeout, reports `false`.
    pub async fn health(&self, timeout: Duration) -> bool {
        let result = self
            .client
            .get(self.url("/health"))
            .timeout(timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Backend is reachable");
                true
            }
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Backend responded with error");
                false
            }
            Err(e) => {
                warn!(error = %e, base_url = %self.base_url, "Backend is not reachable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use streamia_core::MemoryStore;

    use super::*;
    use crate::response::{NETWORK_ERROR, SESSION_EXPIRED};
    use crate::testing::serve;

    fn tokens() -> TokenStore {
        TokenStore::new(Arc::new(MemoryStore::new()))
    }

    async fn echo_auth(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "authorization": auth, "contentType": content_type }))
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url(" https://streamia-server.onrender.com/ "),
            "https://streamia-server.onrender.com"
        );
        assert_eq!(normalize_base_url("localhost:3000"), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_bearer_header_only_with_token() {
        let base = serve(Router::new().route("/echo", get(echo_auth))).await;
        let tokens = tokens();
        let client = ApiClient::new(&base, tokens.clone()).unwrap();

        let anonymous: ApiResponse<Value> = client.get("/echo").await;
        let body = anonymous.data.unwrap();
        assert_eq!(body["authorization"], Value::Null);
        assert_eq!(body["contentType"], "application/json");

        tokens.save("jwt-123").unwrap();
        let signed: ApiResponse<Value> = client.get("/echo").await;
        assert_eq!(signed.data.unwrap()["authorization"], "Bearer jwt-123");
    }

    #[tokio::test]
    async fn test_unauthorized_discards_token() {
        let router = Router::new().route(
            "/api/users/profile",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "jwt expired" }))) }),
        );
        let base = serve(router).await;
        let tokens = tokens();
        tokens.save("stale").unwrap();
        let client = ApiClient::new(&base, tokens.clone()).unwrap();

        let resp: ApiResponse<Value> = client.get("/api/users/profile").await;
        assert!(!resp.success);
        assert!(resp.is_unauthorized());
        assert_eq!(resp.error.as_deref(), Some(SESSION_EXPIRED));
        assert!(!tokens.is_present());
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let router = Router::new().route(
            "/boom",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = serve(router).await;
        let client = ApiClient::new(&base, tokens()).unwrap();

        let resp: ApiResponse<Value> = client.get("/boom").await;
        assert_eq!(resp.status, Some(502));
        assert_eq!(resp.error.as_deref(), Some("HTTP Error: 502"));
    }

    #[tokio::test]
    async fn test_network_failure_is_reported_not_raised() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{}", addr), tokens()).unwrap();
        let resp: ApiResponse<Value> = client.get("/api/favorites").await;
        assert!(!resp.success);
        assert_eq!(resp.status, None);
        assert_eq!(resp.error.as_deref(), Some(NETWORK_ERROR));
        assert!(!client.health(Duration::from_millis(500)).await);
    }

    #[tokio::test]
    async fn test_health() {
        let base = serve(Router::new().route("/health", get(|| async { "ok" }))).await;
        let client = ApiClient::new(&base, tokens()).unwrap();
        assert!(client.health(Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let base = serve(Router::new().route("/n", get(|| async { Json(json!({ "x": 1 })) }))).await;
        let client = ApiClient::new(&base, tokens()).unwrap();

        let resp: ApiResponse<Vec<u32>> = client.get("/n").await;
        assert!(!resp.success);
        assert_eq!(resp.status, Some(200));
        assert!(resp.error.unwrap().starts_with("Respuesta inválida del servidor"));
    }
}
