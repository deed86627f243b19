//! AssistantApi trait implementation for AssistantsClient.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::run::{ListResponse, Run, RunSettings, ThreadMessage};
use crate::{AiError, AssistantApi, ToolOutput};

use super::client::{
    build_assistant_body, build_run_body, build_tool_outputs_body, AssistantsClient,
};
use super::config::AssistantSpec;

#[derive(Deserialize)]
struct Created {
    id: String,
}

#[async_trait]
impl AssistantApi for AssistantsClient {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String, AiError> {
        debug!(model = %spec.model, name = %spec.name, "Creating assistant");
        let request = self
            .http
            .post(self.url("assistants"))
            .json(&build_assistant_body(spec));
        let created: Created = self.send_json(request).await?;
        Ok(created.id)
    }

    async fn create_thread(&self) -> Result<String, AiError> {
        debug!("Creating thread");
        let request = self
            .http
            .post(self.url("threads"))
            .json(&serde_json::json!({}));
        let created: Created = self.send_json(request).await?;
        Ok(created.id)
    }

    async fn add_message(&self, thread_id: &str, text: &str) -> Result<(), AiError> {
        debug!(thread_id, "Adding user message");
        let request = self
            .http
            .post(self.url(&format!("threads/{thread_id}/messages")))
            .json(&serde_json::json!({ "role": "user", "content": text }));
        self.send(request).await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        settings: &RunSettings,
    ) -> Result<Run, AiError> {
        debug!(thread_id, assistant_id, "Creating run");
        let request = self
            .http
            .post(self.url(&format!("threads/{thread_id}/runs")))
            .json(&build_run_body(assistant_id, settings));
        self.send_json(request).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AiError> {
        let request = self
            .http
            .get(self.url(&format!("threads/{thread_id}/runs/{run_id}")));
        self.send_json(request).await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AiError> {
        let request = self
            .http
            .post(self.url(&format!(
                "threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
            )))
            .json(&build_tool_outputs_body(outputs));
        self.send_json(request).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AiError> {
        debug!(thread_id, run_id, "Cancelling run");
        let request = self
            .http
            .post(self.url(&format!("threads/{thread_id}/runs/{run_id}/cancel")));
        self.send_json(request).await
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<ThreadMessage>, AiError> {
        let request = self
            .http
            .get(self.url(&format!("threads/{thread_id}/messages")))
            .query(&[("order", "desc"), ("limit", "1")]);
        let list: ListResponse<ThreadMessage> = self.send_json(request).await?;
        Ok(list.data.into_iter().next())
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, AiError> {
        debug!(file_id, "Fetching file content");
        let request = self
            .http
            .get(self.url(&format!("files/{file_id}/content")));
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
