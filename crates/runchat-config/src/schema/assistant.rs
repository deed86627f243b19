//! Remote assistant configuration.

use serde::{Deserialize, Serialize};

/// Settings used when creating the remote assistant and its runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub name: String,
    pub instructions: String,
    /// Model or Azure deployment name.
    pub model: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Nucleus sampling mass (valid range: 0.0-1.0).
    pub top_p: f64,
    /// Declare the hosted code interpreter alongside the local functions.
    pub code_interpreter: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "날씨+그래프 봇".to_string(),
            instructions: "너는 친절한 한국어 챗봇이야. 날씨, 시간, 수식 그래프 그리기 등을 도와줘. \
                           모르는 도시는 솔직히 모른다고 해."
                .to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 1.0,
            top_p: 1.0,
            code_interpreter: true,
        }
    }
}
