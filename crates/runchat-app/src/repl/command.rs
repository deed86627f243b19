//! Parsing of one input line into a REPL command.

/// What the user asked for on one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text sent to the assistant.
    Chat(String),
    Save(String),
    Load(String),
    Delete(String),
    List,
    New,
    Temperature(f64),
    TopP(f64),
    History,
    Usage,
    /// Effective config and the current sampling overrides.
    Config,
    Help,
    Quit,
    /// Blank line.
    Empty,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("/{command}: '{value}' is not a number")]
    InvalidNumber { command: &'static str, value: String },
    #[error("/{command} must be between {min} and {max}")]
    OutOfRange {
        command: &'static str,
        min: f64,
        max: f64,
    },
}

pub const HELP: &str = "\
Commands:
  /save <title>       save the current conversation
  /load <title>       switch to a saved conversation
  /delete <title>     delete a saved conversation
  /list               list saved conversations
  /new                start a new conversation
  /temperature <f>    sampling temperature (0-2)
  /top_p <f>          nucleus sampling (0-1)
  /history            show the current conversation
  /usage              show token usage
  /config             show the effective configuration
  /help               show this help
  /quit               exit
Anything else is sent to the assistant.";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "save" => title("save", arg).map(Command::Save),
        "load" => title("load", arg).map(Command::Load),
        "delete" => title("delete", arg).map(Command::Delete),
        "list" => Ok(Command::List),
        "new" => Ok(Command::New),
        "temperature" => number("temperature", arg, 0.0, 2.0).map(Command::Temperature),
        "top_p" => number("top_p", arg, 0.0, 1.0).map(Command::TopP),
        "history" => Ok(Command::History),
        "usage" => Ok(Command::Usage),
        "config" => Ok(Command::Config),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn title(command: &'static str, arg: &str) -> Result<String, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    Ok(arg.to_string())
}

fn number(command: &'static str, arg: &str, min: f64, max: f64) -> Result<f64, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    let value: f64 = arg.parse().map_err(|_| CommandError::InvalidNumber {
        command,
        value: arg.to_string(),
    })?;
    if !(min..=max).contains(&value) {
        return Err(CommandError::OutOfRange { command, min, max });
    }
    Ok(value)
}
