//! Assistants API client struct, request building, and response checks.

use std::time::Duration;

use crate::run::RunSettings;
use crate::{AiError, ToolOutput};

use super::config::{AssistantSpec, AssistantsConfig};

/// Assistants API client.
pub struct AssistantsClient {
    pub(crate) config: AssistantsConfig,
    pub(crate) http: reqwest::Client,
}

impl AssistantsClient {
    pub fn new(config: AssistantsConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        Ok(Self { config, http })
    }

    /// Absolute URL of an API path such as `threads/{id}/runs`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/openai/{}", self.config.endpoint, path)
    }

    /// Attach authentication and the API version to a request.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("api-key", &self.config.api_key)
            .query(&[("api-version", self.config.api_version.as_str())])
    }

    /// Send a request and turn non-success statuses into errors.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }
        Ok(response)
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AiError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))
    }
}

/// JSON body for `POST /assistants`.
pub(crate) fn build_assistant_body(spec: &AssistantSpec) -> serde_json::Value {
    let tools: Vec<_> = spec.tools.iter().map(|t| t.to_json()).collect();
    let mut body = serde_json::json!({
        "name": spec.name,
        "instructions": spec.instructions,
        "model": spec.model,
        "temperature": spec.temperature,
        "top_p": spec.top_p,
        "tools": tools,
    });
    if let Some(ref source) = spec.data_source {
        body["data_sources"] = serde_json::json!([source.to_json()]);
    }
    body
}

/// JSON body for `POST /threads/{id}/runs`. Unset settings are omitted so the
/// assistant's own values apply.
pub(crate) fn build_run_body(assistant_id: &str, settings: &RunSettings) -> serde_json::Value {
    let mut body = serde_json::json!({ "assistant_id": assistant_id });
    if let Some(ref model) = settings.model {
        body["model"] = serde_json::json!(model);
    }
    if let Some(temperature) = settings.temperature {
        body["temperature"] = serde_json::json!(temperature);
    }
    if let Some(top_p) = settings.top_p {
        body["top_p"] = serde_json::json!(top_p);
    }
    body
}

/// JSON body for `POST /threads/{id}/runs/{id}/submit_tool_outputs`.
pub(crate) fn build_tool_outputs_body(outputs: &[ToolOutput]) -> serde_json::Value {
    serde_json::json!({ "tool_outputs": outputs })
}
