use crate::protocol::{HostOp, Outgoing};
use anyhow::{Context, Result};
use relview_core::{EditorHost, ShowOptions, TabGroup, TabRef, ViewColumn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// An `EditorHost` that relays every operation over the stdio wire.
///
/// Each call allocates an id, emits a `HostRequest` line, and suspends on a
/// oneshot until the stdin reader resolves the matching `HostResponse`. The
/// actor runs on a single-threaded `LocalSet`, so plain `Rc`/`RefCell`
/// sharing between the host clones is enough.
#[derive(Clone)]
pub struct StdioHost {
    out_tx: mpsc::UnboundedSender<Outgoing>,
    next_id: Rc<RefCell<u64>>,
    pending: Rc<RefCell<HashMap<u64, oneshot::Sender<serde_json::Value>>>>,
}

impl StdioHost {
    pub fn new(out_tx: mpsc::UnboundedSender<Outgoing>) -> Self {
        Self {
            out_tx,
            next_id: Rc::new(RefCell::new(0)),
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Resolve a pending request from a `HostResponse` line.
    pub fn resolve(&self, id: u64, result: serde_json::Value) {
        let Some(sender) = self.pending.borrow_mut().remove(&id) else {
            warn!(id, "Received host response for unknown request id");
            return;
        };
        let _ = sender.send(result);
    }

    async fn request(&self, request: HostOp) -> Result<serde_json::Value> {
        let id = {
            let mut next_id = self.next_id.borrow_mut();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(id, tx);
        self.out_tx.send(Outgoing::HostRequest { id, request })?;

        rx.await.context("Host response channel closed")
    }
}

#[async_trait::async_trait(?Send)]
impl EditorHost for StdioHost {
    async fn show_document(&self, path: &Path, options: ShowOptions) -> Result<()> {
        self.request(HostOp::ShowDocument {
            path: path.to_path_buf(),
            options,
        })
        .await?;
        Ok(())
    }

    async fn close_tabs(&self, tabs: &[TabRef]) -> Result<()> {
        self.request(HostOp::CloseTabs {
            tabs: tabs.to_vec(),
        })
        .await?;
        Ok(())
    }

    async fn tab_groups(&self) -> Result<Vec<TabGroup>> {
        let value = self.request(HostOp::TabGroups).await?;
        serde_json::from_value(value).context("Malformed tab_groups response")
    }

    async fn active_column(&self) -> Result<Option<ViewColumn>> {
        let value = self.request(HostOp::ActiveColumn).await?;
        serde_json::from_value(value).context("Malformed active_column response")
    }

    async fn active_document(&self) -> Result<Option<PathBuf>> {
        let value = self.request(HostOp::ActiveDocument).await?;
        serde_json::from_value(value).context("Malformed active_document response")
    }

    async fn visible_editor_count(&self) -> Result<usize> {
        let value = self.request(HostOp::VisibleEditorCount).await?;
        serde_json::from_value(value).context("Malformed visible_editor_count response")
    }

    async fn show_info(&self, message: &str, actions: &[&str]) -> Result<Option<String>> {
        let value = self
            .request(HostOp::ShowInfo {
                message: message.to_string(),
                actions: actions.iter().map(|s| s.to_string()).collect(),
            })
            .await?;
        serde_json::from_value(value).context("Malformed show_info response")
    }

    async fn show_warning(&self, message: &str, actions: &[&str]) -> Result<Option<String>> {
        let value = self
            .request(HostOp::ShowWarning {
                message: message.to_string(),
                actions: actions.iter().map(|s| s.to_string()).collect(),
            })
            .await?;
        serde_json::from_value(value).context("Malformed show_warning response")
    }

    async fn show_error(&self, message: &str) -> Result<()> {
        self.request(HostOp::ShowError {
            message: message.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn execute_command(&self, command: &str) -> Result<()> {
        self.request(HostOp::ExecuteCommand {
            command: command.to_string(),
        })
        .await?;
        Ok(())
    }
}
