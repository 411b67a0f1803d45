//! HTTP gateway for the remote API.

use pulse_shared::{error_detail, ApiError, CreatedPost, CreatedUser, Post, RegisterRequest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Posts requested per feed page. No further pagination is exposed.
pub const FEED_PAGE_LIMIT: u32 = 20;

/// HTTP client for a single base address.
///
/// The address is injected at construction; reconfiguring the client means
/// building a new gateway. Each call resolves or fails exactly once: there
/// are no retries, timeouts, or cancellation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// GET `path` and decode the body.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let rb = self
            .http
            .get(self.url(path))
            .header("Content-Type", "application/json");
        Self::dispatch(rb).await
    }

    /// POST `body` as JSON to `path` and decode the response body.
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        let bytes =
            serde_json::to_vec(body).map_err(|e| ApiError::Deserialize(e.to_string()))?;
        let rb = self
            .http
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(bytes);
        Self::dispatch(rb).await
    }

    /// Resolve a request into a decoded JSON body or a single error.
    ///
    /// A body that is not valid JSON decodes to an empty object instead of
    /// raising; callers that need a body fail their own shape check later.
    /// A non-2xx status always fails, carrying the server's `detail` field
    /// when the error body had one.
    async fn dispatch(rb: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let resp = rb
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();

        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        let body = serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Map::new()));

        if !is_success {
            return Err(ApiError::Http {
                status,
                detail: error_detail(&body),
            });
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    // --- Endpoint methods ---

    /// Liveness probe. Any 2xx counts; the body is ignored.
    pub async fn health(&self) -> Result<(), ApiError> {
        self.get("/health").await.map(|_| ())
    }

    /// Fetch the first feed page in server order.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let body = self
            .get(&format!("/posts?limit={FEED_PAGE_LIMIT}&offset=0"))
            .await?;
        Self::decode(body)
    }

    /// Create an account.
    pub async fn register(&self, req: &RegisterRequest) -> Result<CreatedUser, ApiError> {
        let body = self.post("/auth/register", req).await?;
        Self::decode(body)
    }

    /// Create a post. The payload is raw JSON: the author id is forwarded as
    /// whatever the operator typed, numeric or not, and a bad value is the
    /// server's to reject.
    pub async fn create_post(&self, payload: &Value) -> Result<CreatedPost, ApiError> {
        let body = self.post("/posts", payload).await?;
        Self::decode(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path_with_one_slash() {
        let client = ApiClient::new("http://127.0.0.1:8000");
        assert_eq!(client.url("/health"), "http://127.0.0.1:8000/health");
        assert_eq!(client.url("health"), "http://127.0.0.1:8000/health");

        let client = ApiClient::new("http://127.0.0.1:8000/");
        assert_eq!(
            client.url("/posts?limit=20&offset=0"),
            "http://127.0.0.1:8000/posts?limit=20&offset=0"
        );
    }

    #[test]
    fn url_passes_absolute_addresses_through() {
        let client = ApiClient::new("http://127.0.0.1:8000");
        assert_eq!(client.url("http://example.org/x"), "http://example.org/x");
    }
}
