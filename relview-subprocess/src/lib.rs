pub mod host;
pub mod protocol;

use crate::host::StdioHost;
use crate::protocol::{Incoming, Outgoing};
use anyhow::anyhow;
use relview_core::{GlobSearch, SessionActor, SettingsManager, StateStore};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::{io, io::AsyncWriteExt};
use tracing::warn;

pub async fn run_subprocess(
    workspace_roots: Vec<String>,
    settings_path: Option<String>,
) -> anyhow::Result<()> {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Outgoing>();
    let stdio_host = StdioHost::new(out_tx.clone());

    let settings = match settings_path {
        Some(path) => SettingsManager::from_path(PathBuf::from(path))?,
        None => SettingsManager::new()?,
    };
    let state_store = StateStore::new()?;

    let (actor, mut event_rx) = SessionActor::launch(
        Box::new(stdio_host.clone()),
        Box::new(GlobSearch::new()),
        settings,
        state_store,
        workspace_roots.into_iter().map(PathBuf::from).collect(),
    );

    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();

    // Everything leaving the process funnels through one channel so event
    // lines and request lines never interleave mid-write.
    join_set.spawn_local(async move {
        let mut stdout = io::stdout();
        while let Some(outgoing) = out_rx.recv().await {
            let json = serde_json::to_string(&outgoing)?;
            let json = format!("{json}\n");
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok(())
    });

    join_set.spawn_local(async move {
        while let Some(event) = event_rx.recv().await {
            out_tx.send(Outgoing::Event(event))?;
        }
        Ok(())
    });

    join_set.spawn_local(async move {
        let mut stdin = BufReader::new(io::stdin()).lines();
        while let Some(line) = stdin.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Incoming>(&line) {
                Ok(Incoming::Message(message)) => actor.tx.send(message)?,
                Ok(Incoming::HostResponse { id, result }) => stdio_host.resolve(id, result),
                Err(e) => warn!(error = %e, "Ignoring malformed input line"),
            }
        }
        Ok(())
    });

    if let Some(result) = join_set.join_next().await {
        return match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(anyhow!(e)),
            Err(panic) => Err(anyhow!(panic)),
        };
    }
    Ok(())
}
