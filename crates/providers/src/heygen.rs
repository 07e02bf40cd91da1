//! HeyGen streaming-avatar client.
//!
//! Server-side only: mints streaming tokens and lists avatars with the
//! account's API key, so the key never reaches the browser.

use std::time::Duration;

use async_trait::async_trait;
use avatarline_config::AvatarConfig;
use avatarline_core::avatar::{AvatarList, AvatarToken, AvatarVendor};
use avatarline_core::error::AvatarError;
use serde::Deserialize;
use tracing::{debug, error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HeyGenClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    #[serde(default)]
    data: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    #[serde(default)]
    token: Option<String>,
}

impl HeyGenClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, AvatarError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AvatarError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    pub fn from_config(config: &AvatarConfig) -> Result<Self, AvatarError> {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    fn key(&self) -> Result<&str, AvatarError> {
        self.api_key.as_deref().ok_or(AvatarError::NotConfigured)
    }
}

#[async_trait]
impl AvatarVendor for HeyGenClient {
    fn name(&self) -> &str {
        "heygen"
    }

    async fn create_token(&self) -> std::result::Result<AvatarToken, AvatarError> {
        let key = self.key()?;
        let url = format!("{}/v1/streaming.create_token", self.base_url);
        debug!(%url, "Requesting streaming token");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| AvatarError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "HeyGen token request failed");
            return Err(AvatarError::Vendor {
                status: status.as_u16(),
                message: "Failed to create HeyGen token".into(),
            });
        }

        let envelope: TokenEnvelope = response
            .json()
            .await
            .map_err(|e| AvatarError::InvalidResponse(e.to_string()))?;

        envelope
            .data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .map(|token| AvatarToken { token })
            .ok_or_else(|| AvatarError::InvalidResponse("Invalid token response from HeyGen".into()))
    }

    async fn list_avatars(&self) -> std::result::Result<AvatarList, AvatarError> {
        let key = self.key()?;
        let url = format!("{}/v1/streaming.avatar.list", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-api-key", key)
            .send()
            .await
            .map_err(|e| AvatarError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "HeyGen avatar list failed");
            return Err(AvatarError::Vendor {
                status: status.as_u16(),
                message: format!("HeyGen API error: {}", status.as_u16()),
            });
        }

        let list: AvatarList = response
            .json()
            .await
            .map_err(|e| AvatarError::InvalidResponse(e.to_string()))?;
        debug!(count = list.data.len(), "Fetched avatar list");
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn keyed(headers: &HeaderMap) -> bool {
        headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some("hg-key")
    }

    async fn vendor() -> String {
        let router = Router::new()
            .route(
                "/v1/streaming.create_token",
                post(|headers: HeaderMap| async move {
                    if !keyed(&headers) {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
                    }
                    (StatusCode::OK, Json(json!({"error": null, "data": {"token": "tok_abc"}})))
                }),
            )
            .route(
                "/v1/streaming.avatar.list",
                get(|headers: HeaderMap| async move {
                    if !keyed(&headers) {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "code": 100,
                            "message": "Success",
                            "data": [
                                {"avatar_id": "Anna_public_3", "pose_name": "Anna", "normal_preview": "https://x/a.png", "status": "ACTIVE"},
                                {"avatar_id": "Wayne_20240711"}
                            ]
                        })),
                    )
                }),
            );
        serve(router).await
    }

    #[tokio::test]
    async fn creates_token_with_key() {
        let client = HeyGenClient::new(vendor().await, Some("hg-key".into())).unwrap();
        let token = client.create_token().await.unwrap();
        assert_eq!(token.token, "tok_abc");
    }

    #[tokio::test]
    async fn vendor_rejection_keeps_status() {
        let client = HeyGenClient::new(vendor().await, Some("wrong".into())).unwrap();
        match client.create_token().await.unwrap_err() {
            AvatarError::Vendor { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Failed to create HeyGen token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = HeyGenClient::new("http://127.0.0.1:9", None).unwrap();
        assert!(matches!(client.create_token().await, Err(AvatarError::NotConfigured)));
        assert!(matches!(client.list_avatars().await, Err(AvatarError::NotConfigured)));
    }

    #[tokio::test]
    async fn token_missing_from_body_is_invalid() {
        let router = Router::new().route(
            "/v1/streaming.create_token",
            post(|| async { Json(json!({"data": {}})) }),
        );
        let client = HeyGenClient::new(serve(router).await, Some("hg-key".into())).unwrap();
        let err = client.create_token().await.unwrap_err();
        assert!(matches!(err, AvatarError::InvalidResponse(ref m) if m.contains("Invalid token response")));
    }

    #[tokio::test]
    async fn lists_avatars_with_vendor_fields() {
        let client = HeyGenClient::new(vendor().await, Some("hg-key".into())).unwrap();
        let list = client.list_avatars().await.unwrap();
        assert_eq!(list.envelope["code"], 100);
        assert_eq!(list.envelope["message"], "Success");
        let avatars = list.data;
        assert_eq!(avatars.len(), 2);
        assert_eq!(avatars[0].pose_name.as_deref(), Some("Anna"));
        assert_eq!(avatars[0].extra["status"], Value::from("ACTIVE"));
        assert!(avatars[1].normal_preview.is_none());
    }

    #[tokio::test]
    async fn list_error_reports_status() {
        let client = HeyGenClient::new(vendor().await, Some("nope".into())).unwrap();
        let err = client.list_avatars().await.unwrap_err();
        assert_eq!(err.to_string(), "Vendor returned status 401: HeyGen API error: 401");
    }
}
