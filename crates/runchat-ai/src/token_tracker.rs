//! Token usage reported by completed runs.

use std::collections::BTreeMap;

use crate::TokenUsage;

/// Cumulative token usage, in total and per model.
#[derive(Debug, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_model: BTreeMap<String, TokenUsage>,
    /// Completed runs recorded.
    run_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the usage of one completed run.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        self.total.input_tokens += usage.input_tokens;
        self.total.output_tokens += usage.output_tokens;
        self.run_count += 1;

        let entry = self.by_model.entry(model.to_string()).or_default();
        entry.input_tokens += usage.input_tokens;
        entry.output_tokens += usage.output_tokens;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    /// Per-model usage, ordered by model name.
    pub fn models(&self) -> impl Iterator<Item = (&str, &TokenUsage)> {
        self.by_model.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    pub fn run_count(&self) -> u64 {
        self.run_count
    }
}
