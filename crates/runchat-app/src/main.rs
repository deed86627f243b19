mod cli;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use runchat_ai::{
    AssistantSpec, AssistantsClient, AssistantsConfig, ChatSession, DataSource, OpenMeteoClient,
    PollPolicy, RunSettings, ToolRegistry,
};
use runchat_common::RunchatError;
use runchat_config::{Credentials, RunchatConfig};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
/// Variables already set in the environment win.
fn load_dotenv() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Current directory
        PathBuf::from(".env"),
        // Workspace root, two levels up from crates/runchat-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim().trim_start_matches("export ").trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

fn build_session(config: &RunchatConfig, creds: Credentials) -> Result<ChatSession, RunchatError> {
    let client = AssistantsClient::new(
        AssistantsConfig::new(&creds.endpoint, &creds.api_key).with_api_version(&creds.api_version),
    )
    .map_err(|e| RunchatError::Ai(e.to_string()))?;

    let weather = OpenMeteoClient::new(
        &config.weather.geocoding_url,
        &config.weather.forecast_url,
        Duration::from_secs(config.weather.request_timeout_secs),
    )
    .map_err(|e| RunchatError::Network(e.to_string()))?;

    let mut spec = AssistantSpec::new(&config.assistant.name, &config.assistant.model)
        .with_instructions(&config.assistant.instructions)
        .with_sampling(config.assistant.temperature, config.assistant.top_p);
    if config.assistant.code_interpreter {
        spec = spec.with_code_interpreter();
    }
    if let Some(search) = creds.search {
        tracing::info!(index = %search.index_name, "Retrieval augmentation enabled");
        spec = spec.with_data_source(DataSource {
            endpoint: search.endpoint,
            index_name: search.index_name,
            api_key: search.api_key,
        });
    }

    let policy = PollPolicy::new(
        Duration::from_millis(config.polling.interval_ms),
        Duration::from_secs(config.polling.timeout_secs),
    );

    Ok(
        ChatSession::new(Arc::new(client), ToolRegistry::new(Arc::new(weather)), spec)
            .with_policy(policy)
            .with_settings(RunSettings {
                model: None,
                temperature: Some(config.assistant.temperature),
                top_p: Some(config.assistant.top_p),
            }),
    )
}

async fn run(args: cli::Args, mut config: RunchatConfig) -> Result<(), RunchatError> {
    if let Some(model) = args.model {
        config.assistant.model = model;
    }
    let image_dir = args
        .image_dir
        .unwrap_or_else(|| config.output.image_dir.clone());

    let creds = Credentials::from_env()?;
    tracing::info!(endpoint = %creds.endpoint, api_version = %creds.api_version, "Credentials loaded");

    let mut session = build_session(&config, creds)?;
    repl::run(&mut session, &config, &image_dir).await
}

fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    // Config is read before logging so its level can apply; the CLI flag wins.
    let config = runchat_config::load_config(args.config.as_deref());
    let directive = match (&args.log_level, &config) {
        (Some(level), _) => format!("runchat={level}"),
        (None, Ok(config)) => config.logging.level.as_directive().to_string(),
        (None, Err(_)) => "runchat=info".to_string(),
    };
    init_logging(&directive);

    tracing::info!("runchat v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            eprintln!("runchat: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("runchat: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, config)) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("runchat: {e}");
            ExitCode::FAILURE
        }
    }
}
