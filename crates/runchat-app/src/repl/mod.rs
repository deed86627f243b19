//! Interactive terminal loop around a chat session.

mod command;
mod output;

use std::io::Write;
use std::path::Path;

use runchat_ai::ChatSession;
use runchat_common::RunchatError;
use runchat_config::RunchatConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use command::{parse, Command, HELP};

/// Read lines from stdin until `/quit`, end of input, or Ctrl-C at the prompt.
///
/// Ctrl-C while a reply is pending cancels that reply only.
pub async fn run(
    session: &mut ChatSession,
    config: &RunchatConfig,
    image_dir: &Path,
) -> Result<(), RunchatError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("runchat ready. Type /help for commands.");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Chat(text) => chat(session, &text, image_dir).await,
            Command::Save(title) => match session.save(&title) {
                Ok(()) => println!("saved '{title}'"),
                Err(e) => println!("{e}"),
            },
            Command::Load(title) => match session.load(&title) {
                Ok(()) => {
                    println!("loaded '{title}'");
                    println!("{}", output::format_history(session.messages()));
                }
                Err(e) => println!("{e}"),
            },
            Command::Delete(title) => match session.delete(&title) {
                Ok(()) => println!("deleted '{title}'"),
                Err(e) => println!("{e}"),
            },
            Command::List => {
                let titles = session.saved_titles();
                if titles.is_empty() {
                    println!("(no saved conversations)");
                } else {
                    for title in titles {
                        println!("  {title}");
                    }
                }
            }
            Command::New => {
                session.new_chat();
                println!("started a new conversation");
            }
            Command::Temperature(value) => {
                session.set_temperature(value);
                println!("temperature = {value}");
            }
            Command::TopP(value) => {
                session.set_top_p(value);
                println!("top_p = {value}");
            }
            Command::History => println!("{}", output::format_history(session.messages())),
            Command::Usage => println!("{}", output::format_usage(session.tracker())),
            Command::Config => {
                println!("{}", runchat_config::config_to_json(config));
                println!("{}", output::format_settings(session.settings()));
            }
        }
    }

    info!("Leaving chat loop");
    Ok(())
}

async fn chat(session: &mut ChatSession, text: &str, image_dir: &Path) {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let reply = session.send(text, &cancel).await;
    watcher.abort();

    println!("{}", output::format_message(reply));
    let stem = output::image_stem(chrono::Local::now(), &runchat_common::short_id());
    match output::write_images(image_dir, &stem, &reply.images) {
        Ok(paths) => {
            for path in paths {
                println!("  image: {}", path.display());
            }
        }
        Err(e) => warn!(dir = %image_dir.display(), error = %e, "Failed to write images"),
    }
}
