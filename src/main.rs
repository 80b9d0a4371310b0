use std::path::PathBuf;

use clap::Parser;
use world_editor::config::EditorConfig;
use world_editor::replay::{ReplayScript, run_script};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "world-editor", about = "Replay scripted map-editing sessions")]
struct Cli {
    /// Path to a replay script (JSON).
    script: PathBuf,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let raw = tokio::fs::read_to_string(&cli.script)
        .await
        .map_err(|source| CliError::Read { path: cli.script.clone(), source })?;
    let script: ReplayScript = serde_json::from_str(&raw)?;

    let report = run_script(script, EditorConfig::from_env()).await;
    let rendered = if cli.pretty { serde_json::to_string_pretty(&report)? } else { serde_json::to_string(&report)? };
    println!("{rendered}");
    Ok(())
}
