use crate::host::ViewColumn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// `SessionEvent`s are the output of the session actor.
///
/// The actor is built with two channels: messages in, events out. Front-ends
/// (the stdio bridge, tests) consume events for their own rendering or
/// bookkeeping; none of them is required for the reconciliation itself,
/// which acts on the editor through the `EditorHost` calls instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum SessionEvent {
    /// The actor is processing a message. Emitted `true` at the start and
    /// `false` at the end of each cycle.
    BusyChanged(bool),
    /// Startup completed; the marker file exists at this path.
    Initialised { marker_file: PathBuf },
    /// The tracked related-files pane changed (or became unknown).
    PaneChanged { column: Option<ViewColumn> },
    /// A reconciliation cycle established a new primary and opened its
    /// related set.
    RelatedFilesOpened {
        primary: String,
        related: Vec<String>,
    },
    Error(String),
}

/// A small wrapper over the event channel for convenience.
#[derive(Clone)]
pub struct EventSender {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        (Self { event_tx }, rx)
    }

    pub fn send(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn set_busy(&self, busy: bool) {
        self.send(SessionEvent::BusyChanged(busy));
    }
}
