// src/placeholder.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Envelope returned by every placeholder-API call: a success flag plus
/// either the payload or a generic error string. Transport errors never
/// escape this boundary.
#[derive(Debug, Serialize)]
pub struct ApiResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResult<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn fail(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// A post as accepted by the placeholder API.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceholderPost {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Thin client for the public placeholder REST API consumed by the admin
/// panel. Responses are passed through untyped; this service adds nothing
/// beyond the `ApiResult` envelope and request logging.
#[derive(Clone)]
pub struct PlaceholderClient {
    http: reqwest::Client,
    base: Url,
}

impl PlaceholderClient {
    pub fn new(base: Url) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { http, base }
    }

    pub async fn fetch_users(&self) -> ApiResult<Value> {
        self.get("/users", "Failed to fetch users").await
    }

    pub async fn fetch_posts(&self) -> ApiResult<Value> {
        self.get("/posts?_limit=10", "Failed to fetch posts").await
    }

    pub async fn create_post(&self, post: &PlaceholderPost) -> ApiResult<Value> {
        let url = self.join("/posts");
        tracing::debug!("API Request: POST {}", url);

        match self.http.post(url).json(post).send().await {
            Ok(resp) => Self::decode(resp, "Failed to create post").await,
            Err(e) => {
                tracing::warn!("Placeholder API request failed: {}", e);
                ApiResult::fail("Failed to create post")
            }
        }
    }

    pub async fn update_post(&self, id: i64, post: &PlaceholderPost) -> ApiResult<Value> {
        let url = self.join(&format!("/posts/{}", id));
        tracing::debug!("API Request: PUT {}", url);

        match self.http.put(url).json(post).send().await {
            Ok(resp) => Self::decode(resp, "Failed to update post").await,
            Err(e) => {
                tracing::warn!("Placeholder API request failed: {}", e);
                ApiResult::fail("Failed to update post")
            }
        }
    }

    pub async fn delete_post(&self, id: i64) -> ApiResult<Value> {
        let url = self.join(&format!("/posts/{}", id));
        tracing::debug!("API Request: DELETE {}", url);

        match self.http.delete(url).send().await {
            Ok(resp) => {
                tracing::debug!("API Response: {} {}", resp.status(), resp.url());
                if resp.status().is_success() {
                    ApiResult::ok(Value::Null)
                } else {
                    ApiResult::fail("Failed to delete post")
                }
            }
            Err(e) => {
                tracing::warn!("Placeholder API request failed: {}", e);
                ApiResult::fail("Failed to delete post")
            }
        }
    }

    async fn get(&self, path: &str, error_message: &str) -> ApiResult<Value> {
        let url = self.join(path);
        tracing::debug!("API Request: GET {}", url);

        match self.http.get(url).send().await {
            Ok(resp) => Self::decode(resp, error_message).await,
            Err(e) => {
                tracing::warn!("Placeholder API request failed: {}", e);
                ApiResult::fail(error_message)
            }
        }
    }

    async fn decode(resp: reqwest::Response, error_message: &str) -> ApiResult<Value> {
        tracing::debug!("API Response: {} {}", resp.status(), resp.url());

        if !resp.status().is_success() {
            return ApiResult::fail(error_message);
        }
        match resp.json::<Value>().await {
            Ok(data) => ApiResult::ok(data),
            Err(e) => {
                tracing::warn!("Placeholder API returned invalid JSON: {}", e);
                ApiResult::fail(error_message)
            }
        }
    }

    fn join(&self, path: &str) -> Url {
        // The base URL is validated at startup; joining a known-literal path
        // cannot fail.
        self.base
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base.clone())
    }
}
