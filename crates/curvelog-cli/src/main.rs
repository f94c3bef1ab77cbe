mod cmd_replay;
mod collab;
mod script;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "curvelog", version, about = "Undo/redo history for GAM curve edits")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON script of edits and navigation, then print the history
    Replay {
        /// Path to the script file
        script: PathBuf,
        /// Session config (JSON); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Replay {
            script,
            config,
            json,
        } => {
            let params = cmd_replay::ReplayParams {
                script: &script,
                config: config.as_deref(),
                json,
            };
            tokio::runtime::Runtime::new()?.block_on(cmd_replay::execute(&params))
        }
    }
}
