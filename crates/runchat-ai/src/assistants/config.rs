//! Assistants client configuration and assistant definition.

use std::fmt;

use crate::tools::{builtin_tools, to_assistant_tool};
use crate::ToolDefinition;

pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Connection settings for the Assistants API.
#[derive(Clone)]
pub struct AssistantsConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
}

impl fmt::Debug for AssistantsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantsConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AssistantsConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

/// A tool declared on the assistant.
#[derive(Debug, Clone)]
pub enum AssistantTool {
    /// Hosted code execution; produces the image files rendered in replies.
    CodeInterpreter,
    Function(ToolDefinition),
}

impl AssistantTool {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AssistantTool::CodeInterpreter => serde_json::json!({ "type": "code_interpreter" }),
            AssistantTool::Function(def) => to_assistant_tool(def),
        }
    }
}

/// Search index used for retrieval augmentation.
#[derive(Clone)]
pub struct DataSource {
    pub endpoint: String,
    pub index_name: String,
    pub api_key: String,
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("endpoint", &self.endpoint)
            .field("index_name", &self.index_name)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl DataSource {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "azure_search",
            "parameters": {
                "endpoint": self.endpoint,
                "index_name": self.index_name,
                "authentication": {
                    "type": "api_key",
                    "key": self.api_key,
                }
            }
        })
    }
}

/// Everything needed to create the remote assistant.
#[derive(Debug, Clone)]
pub struct AssistantSpec {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub tools: Vec<AssistantTool>,
    pub data_source: Option<DataSource>,
}

impl AssistantSpec {
    /// An assistant declaring the built-in functions and nothing else.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            model: model.into(),
            temperature: 1.0,
            top_p: 1.0,
            tools: builtin_tools()
                .into_iter()
                .map(AssistantTool::Function)
                .collect(),
            data_source: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f64, top_p: f64) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    /// Declare the hosted code interpreter ahead of the local functions.
    pub fn with_code_interpreter(mut self) -> Self {
        if !self
            .tools
            .iter()
            .any(|t| matches!(t, AssistantTool::CodeInterpreter))
        {
            self.tools.insert(0, AssistantTool::CodeInterpreter);
        }
        self
    }

    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_source = Some(source);
        self
    }
}
