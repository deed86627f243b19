//! Formatting of replies, history and usage for the terminal.

use std::path::{Path, PathBuf};

use runchat_ai::{Message, MessageKind, Role, RunSettings, TokenTracker};

/// Write PNG images into `dir` as `{stem}-{n}.png`, creating `dir` if needed.
pub fn write_images(dir: &Path, stem: &str, images: &[Vec<u8>]) -> std::io::Result<Vec<PathBuf>> {
    if images.is_empty() {
        return Ok(Vec::new());
    }
    std::fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(images.len());
    for (i, png) in images.iter().enumerate() {
        let path = dir.join(format!("{stem}-{}.png", i + 1));
        std::fs::write(&path, png)?;
        paths.push(path);
    }
    Ok(paths)
}

/// File stem for the images of one reply. `tag` separates replies that
/// land in the same second.
pub fn image_stem(now: chrono::DateTime<chrono::Local>, tag: &str) -> String {
    format!("reply-{}-{tag}", now.format("%Y%m%d-%H%M%S"))
}

fn label(message: &Message) -> &'static str {
    match (message.role, message.kind) {
        (Role::User, _) => "you",
        (Role::Assistant, MessageKind::Reply) => "assistant",
        (Role::Assistant, MessageKind::Failure) => "error",
    }
}

pub fn format_message(message: &Message) -> String {
    let mut out = format!("[{}] {}", label(message), message.text);
    if !message.images.is_empty() {
        out.push_str(&format!(" ({} image(s))", message.images.len()));
    }
    out
}

pub fn format_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "(no messages yet)".to_string();
    }
    messages
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-run overrides in effect; unset values fall back to the assistant's.
pub fn format_settings(settings: &RunSettings) -> String {
    let show = |v: Option<f64>| v.map_or_else(|| "default".to_string(), |v| v.to_string());
    format!(
        "active: temperature = {}, top_p = {}",
        show(settings.temperature),
        show(settings.top_p)
    )
}

pub fn format_usage(tracker: &TokenTracker) -> String {
    let total = tracker.total();
    let mut out = format!(
        "{} run(s): {} prompt + {} completion = {} tokens",
        tracker.run_count(),
        total.input_tokens,
        total.output_tokens,
        tracker.total_tokens()
    );
    for (model, usage) in tracker.models() {
        out.push_str(&format!(
            "\n  {model}: {} prompt + {} completion",
            usage.input_tokens, usage.output_tokens
        ));
    }
    out
}
