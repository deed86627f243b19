use std::path::PathBuf;

use clap::Parser;

/// runchat: chat with a hosted assistant that can look up weather and local
/// time and draw charts.
#[derive(Parser, Debug)]
#[command(name = "runchat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory that generated images are written to.
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Model deployment override.
    #[arg(short = 'm', long)]
    pub model: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
