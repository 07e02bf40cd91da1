//! Supervisor client for the OpenAI Responses API.
//!
//! One `send` is one POST to `{base_url}/responses`. The accumulated
//! [`SupervisorRequest`] already holds the `input` items in wire order; this
//! client adds the envelope and maps HTTP failures onto [`SupervisorError`].
//! Nothing is retried here.

use std::time::Duration;

use async_trait::async_trait;
use avatarline_config::SupervisorConfig;
use avatarline_core::error::SupervisorError;
use avatarline_core::supervisor::{
    SupervisorClient, SupervisorRequest, SupervisorResponse, ToolDefinition,
};
use serde::Serialize;
use tracing::{debug, warn};

pub struct ResponsesClient {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ResponsesClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SupervisorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SupervisorError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: "openai-responses".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    pub fn from_config(config: &SupervisorConfig) -> Result<Self, SupervisorError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Convert tool definitions to the Responses API format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiTool<'_>> {
        tools
            .iter()
            .map(|t| ApiTool {
                r#type: "function",
                name: &t.name,
                description: &t.description,
                parameters: &t.parameters,
                strict: t.strict,
            })
            .collect()
    }

    /// The JSON body for one round-trip.
    pub fn request_body(request: &SupervisorRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "input": request.input(),
            "tools": Self::to_api_tools(&request.tools),
            "parallel_tool_calls": false,
        })
    }
}

#[async_trait]
impl SupervisorClient for ResponsesClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(
        &self,
        request: &SupervisorRequest,
    ) -> std::result::Result<SupervisorResponse, SupervisorError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SupervisorError::NotConfigured(
                "no API key for the completion endpoint".into(),
            ));
        };

        let url = format!("{}/responses", self.base_url);
        debug!(
            client = %self.name,
            model = %request.model,
            input_items = request.exchanged().len() + 2,
            "Sending supervisor request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| SupervisorError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(SupervisorError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Supervisor endpoint returned error");
            return Err(SupervisorError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SupervisorError::MalformedResponse(format!("body is not JSON: {e}")))?;

        // The endpoint can report failures inside a 200 body
        if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
            let message = error["message"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| error.to_string());
            return Err(SupervisorError::ApiError {
                status_code: status,
                message,
            });
        }

        serde_json::from_value(body)
            .map_err(|e| SupervisorError::MalformedResponse(format!("unexpected shape: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct ApiTool<'a> {
    r#type: &'static str,
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
    strict: bool,
}
