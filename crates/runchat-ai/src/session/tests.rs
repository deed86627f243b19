//! Tests for conversation snapshots and full chat exchanges.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::testing::{run_json, run_requiring, run_with_status, text_message, FakeWeather, ScriptedApi};
use crate::tools::ToolRegistry;
use crate::{AssistantSpec, Message, MessageKind, PollPolicy, Role};

fn fast_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_millis(1), Duration::from_secs(5))
}

fn session(api: Arc<ScriptedApi>) -> ChatSession {
    let tools = ToolRegistry::new(Arc::new(FakeWeather::new(4.0, 0)))
        .with_clock(Box::new(|| Utc.with_ymd_and_hms(2024, 1, 15, 3, 30, 0).unwrap()));
    ChatSession::new(api, tools, AssistantSpec::new("bot", "gpt-4o-mini")).with_policy(fast_policy())
}

fn completed_api() -> Arc<ScriptedApi> {
    Arc::new(ScriptedApi::new(
        run_with_status("run_1", "queued"),
        vec![run_with_status("run_1", "completed")],
    ))
}

// --- store ---

#[test]
fn save_is_a_copy() {
    let mut store = ConversationStore::new();
    store.push(Message::user("hello"));
    store.set_thread_id("thread_a");
    store.save("first").unwrap();

    store.push(Message::user("more"));
    store.set_thread_id("thread_b");

    store.load("first").unwrap();
    assert_eq!(store.messages(), &[Message::user("hello")]);
    assert_eq!(store.thread_id(), Some("thread_a"));
}

#[test]
fn load_restores_messages_and_thread() {
    let mut store = ConversationStore::new();
    store.push(Message::user("a"));
    store.set_thread_id("thread_a");
    store.save("a").unwrap();

    store.reset();
    store.push(Message::user("b"));
    store.set_thread_id("thread_b");

    store.load("a").unwrap();
    assert_eq!(store.messages(), &[Message::user("a")]);
    assert_eq!(store.thread_id(), Some("thread_a"));
}

#[test]
fn unknown_title_leaves_state_untouched() {
    let mut store = ConversationStore::new();
    store.push(Message::user("keep me"));
    store.set_thread_id("thread_k");

    assert_eq!(
        store.load("missing"),
        Err(StoreError::NotFound("missing".into()))
    );
    assert_eq!(store.messages().len(), 1);
    assert_eq!(store.thread_id(), Some("thread_k"));
    assert!(store.delete("missing").is_err());
}

#[test]
fn empty_title_is_rejected() {
    let mut store = ConversationStore::new();
    assert_eq!(store.save("   "), Err(StoreError::EmptyTitle));
    assert!(store.titles().is_empty());
}

#[test]
fn titles_are_sorted_and_survive_reset() {
    let mut store = ConversationStore::new();
    store.save("zeta").unwrap();
    store.save("alpha").unwrap();
    store.reset();
    assert_eq!(store.titles(), vec!["alpha", "zeta"]);

    store.delete("zeta").unwrap();
    assert_eq!(store.titles(), vec!["alpha"]);
}

// --- exchanges ---

#[tokio::test]
async fn seoul_weather_round_trip() {
    let api = Arc::new(
        ScriptedApi::new(
            run_with_status("run_1", "queued"),
            vec![
                run_requiring(
                    "run_1",
                    &[("call_1", "get_current_weather", r#"{"location":"Seoul"}"#)],
                ),
                run_json(serde_json::json!({
                    "id": "run_1",
                    "status": "completed",
                    "model": "gpt-4o-mini",
                    "usage": { "prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150 }
                })),
            ],
        )
        .with_reply(|batches| {
            let output: serde_json::Value =
                serde_json::from_str(&batches[0][0].output).unwrap();
            text_message(&format!(
                "{}의 현재 기온은 {}도입니다.",
                output["location"].as_str().unwrap(),
                output["temperature"]
            ))
        }),
    );
    let mut chat = session(api.clone());

    let reply = chat.send("서울 날씨 알려줘", &CancellationToken::new()).await;
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.kind, MessageKind::Reply);
    assert!(reply.text.contains("Seoul"));
    assert!(reply.text.contains("4.0"));

    assert_eq!(chat.messages().len(), 2);
    assert_eq!(chat.messages()[0], Message::user("서울 날씨 알려줘"));
    assert_eq!(chat.thread_id(), Some("thread_1"));
    assert_eq!(chat.tracker().total_tokens(), 150);
    let models: Vec<&str> = chat.tracker().models().map(|(m, _)| m).collect();
    assert_eq!(models, vec!["gpt-4o-mini"]);

    let log = api.log();
    assert_eq!(log[0], "create_assistant:gpt-4o-mini");
    assert_eq!(log[1], "create_thread");
    assert_eq!(log[2], "add_message:thread_1:서울 날씨 알려줘");
    assert_eq!(log[3], "create_run:thread_1:asst_1");
}

#[tokio::test]
async fn thread_and_assistant_are_reused() {
    let api = completed_api();
    let mut chat = session(api.clone());
    chat.send("one", &CancellationToken::new()).await;

    api.script(
        run_with_status("run_2", "queued"),
        vec![run_with_status("run_2", "completed")],
    );
    chat.send("two", &CancellationToken::new()).await;

    let log = api.log();
    assert_eq!(log.iter().filter(|e| *e == "create_thread").count(), 1);
    assert_eq!(
        log.iter().filter(|e| e.starts_with("create_assistant")).count(),
        1
    );
    assert!(log.contains(&"add_message:thread_1:two".to_string()));
    assert_eq!(chat.messages().len(), 4);
}

#[tokio::test]
async fn new_chat_opens_a_fresh_thread() {
    let api = completed_api();
    let mut chat = session(api.clone());
    chat.send("one", &CancellationToken::new()).await;
    chat.save("first").unwrap();

    chat.new_chat();
    assert!(chat.messages().is_empty());
    assert_eq!(chat.thread_id(), None);

    api.script(
        run_with_status("run_2", "queued"),
        vec![run_with_status("run_2", "completed")],
    );
    chat.send("two", &CancellationToken::new()).await;
    assert_eq!(chat.thread_id(), Some("thread_2"));
    assert_eq!(chat.saved_titles(), vec!["first"]);
}

#[tokio::test]
async fn loaded_conversation_continues_its_thread() {
    let api = completed_api();
    let mut chat = session(api.clone());
    chat.send("one", &CancellationToken::new()).await;
    chat.save("first").unwrap();
    chat.new_chat();

    chat.load("first").unwrap();
    assert_eq!(chat.thread_id(), Some("thread_1"));
    assert_eq!(chat.messages().len(), 2);

    api.script(
        run_with_status("run_2", "queued"),
        vec![run_with_status("run_2", "completed")],
    );
    chat.send("again", &CancellationToken::new()).await;
    assert!(api.log().contains(&"add_message:thread_1:again".to_string()));
}

#[tokio::test]
async fn failed_run_becomes_failure_message() {
    let api = Arc::new(ScriptedApi::new(
        run_with_status("run_1", "queued"),
        vec![run_json(serde_json::json!({
            "id": "run_1",
            "status": "failed",
            "last_error": { "code": "server_error", "message": "boom" }
        }))],
    ));
    let mut chat = session(api);

    let reply = chat.send("hi", &CancellationToken::new()).await;
    assert!(reply.is_failure());
    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.text.contains("failed"));
    assert!(reply.text.contains("boom"));
    assert_eq!(chat.messages().len(), 2);
}

#[tokio::test]
async fn timeout_becomes_failure_message() {
    let api = Arc::new(ScriptedApi::new(
        run_with_status("run_1", "queued"),
        vec![run_with_status("run_1", "in_progress")],
    ));
    let mut chat = session(api.clone())
        .with_policy(PollPolicy::new(Duration::from_millis(2), Duration::from_millis(20)));

    let reply = chat.send("hi", &CancellationToken::new()).await;
    assert!(reply.is_failure());
    assert!(api.log().contains(&"cancel_run:thread_1:run_1".to_string()));
}

#[tokio::test]
async fn transport_error_becomes_failure_message() {
    let api = Arc::new(completed_api_failing_threads());
    let mut chat = session(api);

    let reply = chat.send("hi", &CancellationToken::new()).await;
    assert!(reply.is_failure());
    assert!(reply.text.contains("connection reset"));
    assert_eq!(chat.thread_id(), None);
}

fn completed_api_failing_threads() -> ScriptedApi {
    ScriptedApi::new(
        run_with_status("run_1", "queued"),
        vec![run_with_status("run_1", "completed")],
    )
    .failing_thread_creation()
}

#[tokio::test]
async fn sampling_overrides_reach_the_run() {
    let api = completed_api();
    let mut chat = session(api.clone());
    chat.set_temperature(0.3);
    chat.set_top_p(0.7);
    chat.send("hi", &CancellationToken::new()).await;

    let settings = api.run_settings.lock().unwrap();
    assert_eq!(settings[0].temperature, Some(0.3));
    assert_eq!(settings[0].top_p, Some(0.7));
}

#[tokio::test]
async fn poll_error_cancels_run_and_becomes_failure_message() {
    let api = Arc::new(ScriptedApi::new(run_with_status("run_1", "queued"), vec![]));
    let mut chat = session(api.clone());

    let reply = chat.send("hi", &CancellationToken::new()).await;
    assert!(reply.is_failure());
    assert!(reply.text.starts_with("request failed"));
    assert!(api.log().contains(&"cancel_run:thread_1:run_1".to_string()));
}

#[tokio::test]
async fn user_cancellation_becomes_failure_message() {
    let api = Arc::new(ScriptedApi::new(
        run_with_status("run_1", "queued"),
        vec![run_with_status("run_1", "in_progress")],
    ));
    let mut chat = session(api.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let reply = chat.send("hi", &cancel).await;
    assert!(reply.is_failure());
    assert_eq!(reply.text, "request cancelled");
    assert!(api.log().contains(&"cancel_run:thread_1:run_1".to_string()));
    assert_eq!(chat.messages().len(), 2);
}
