//! Session module
//!
//! Wires an input source and an output sink to a dispatcher. Input is either
//! standard input (typed interactively or redirected) or a script file.

mod connection;

use crate::config::Config;
use anyhow::Context;
use crate::dispatch::Dispatcher;
use crate::store::StackStats;
use std::io::IsTerminal;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tracing::info;

pub use connection::Connection;

/// Run a session on standard input and output
///
/// The configured prompt is only shown when standard input is a terminal.
pub async fn run_stdio(config: &Config) -> anyhow::Result<StackStats> {
    let prompt = if std::io::stdin().is_terminal() {
        config.prompt.clone()
    } else {
        None
    };

    let reader = BufReader::new(tokio::io::stdin());
    run_with(config, reader, tokio::io::stdout(), prompt).await
}

/// Run a session reading commands from a script file
pub async fn run_file(config: &Config, path: impl AsRef<Path>) -> anyhow::Result<StackStats> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open input file {}", path.display()))?;

    info!("Reading commands from {}", path.display());
    run_with(config, BufReader::new(file), tokio::io::stdout(), None).await
}

/// Run a session over arbitrary streams
pub async fn run_with<R, W>(
    config: &Config,
    reader: R,
    writer: W,
    prompt: Option<String>,
) -> anyhow::Result<StackStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut dispatcher = Dispatcher::with_capacity(config.initial_capacity);
    dispatcher.set_echo(config.echo);

    let mut connection = Connection::new(reader, writer).with_prompt(prompt);
    let executed = connection.handle(&mut dispatcher).await?;

    let stats = dispatcher.stats();
    info!(
        executed,
        depth = stats.depth,
        committed_keys = stats.committed_keys,
        pending_changes = stats.pending_changes,
        "Session finished"
    );

    Ok(stats)
}
