//! Wire format of the stdio bridge: one JSON object per line.
//!
//! The extension writes `Incoming` lines to the subprocess stdin and reads
//! `Outgoing` lines from its stdout. Editor operations flow as request and
//! response pairs correlated by id, so the extension can service them with
//! its own async editor API and answer out of order.

use relview_core::{SessionEvent, SessionMessage, ShowOptions, TabRef};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A line written to stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Outgoing {
    /// A session event, forwarded verbatim.
    Event(SessionEvent),
    /// An editor operation the extension must perform and answer.
    HostRequest { id: u64, request: HostOp },
}

/// A line read from stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Incoming {
    /// An editor event for the session actor.
    Message(SessionMessage),
    /// The answer to an earlier `HostRequest` with the same id. `result`
    /// carries the operation's return value, or null for fire-and-forget
    /// operations.
    HostResponse {
        id: u64,
        #[serde(default)]
        result: serde_json::Value,
    },
}

/// The editor operations the session actor can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostOp {
    ShowDocument {
        path: PathBuf,
        options: ShowOptions,
    },
    CloseTabs {
        tabs: Vec<TabRef>,
    },
    TabGroups,
    ActiveColumn,
    ActiveDocument,
    VisibleEditorCount,
    ShowInfo {
        message: String,
        actions: Vec<String>,
    },
    ShowWarning {
        message: String,
        actions: Vec<String>,
    },
    ShowError {
        message: String,
    },
    ExecuteCommand {
        command: String,
    },
}
