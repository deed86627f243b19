//! Azure OpenAI Assistants API client.
//!
//! Implements the `AssistantApi` trait over the REST endpoints under
//! `{endpoint}/openai/` using `api-key` authentication.

mod api;
mod client;
mod config;


pub use client::AssistantsClient;
pub use config::{AssistantSpec, AssistantTool, AssistantsConfig, DataSource};
