use crate::{
    host::{EditorHost, ShowOptions, TabRef, ViewColumn},
    related::{self, FileSearch, ResolveError},
    session::{
        events::{EventSender, SessionEvent},
        marker::{create_marker_file, StateStore, MARKER_DIR, MARKER_FILE_NAME},
    },
    settings::{ActivationMode, SettingKey, SettingsManager},
    view::{last_column, locate_pane, marker_columns, ViewState},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// State-store key holding the marker file location across sessions.
const MARKER_URL_KEY: &str = "marker_file_url";

const INITIALISED_NOTICE: &str = "Related Files View has initialised.";
const DO_NOT_SHOW_AGAIN: &str = "Do Not Show Again";
const NO_WORKSPACE_MESSAGE: &str = "The current file is not in a workspace.";
const RESTART_NOTICE: &str =
    "You need to restart the editor for this configuration change to take effect.";
const RESTART_ACTION: &str = "Restart Now";
const RELOAD_WINDOW_COMMAND: &str = "workbench.action.reloadWindow";

/// A tab the host reports as closed, with the column it occupied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTab {
    pub path: PathBuf,
    pub column: ViewColumn,
}

/// The possible input messages to the `SessionActor`.
///
/// These messages derive serde for use across processes: editor extensions
/// spawn relview-core in a sub-process and forward their window/tab events
/// to the actor as json lines over stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum SessionMessage {
    /// The exposed command: open related files for the given document, or
    /// for the active one when none is given.
    OpenRelatedFiles { document: Option<PathBuf> },
    /// The active editor changed. Only acted on in on-editor-change
    /// activation mode.
    EditorChanged { document: Option<PathBuf> },
    /// A text document was opened somewhere in the window.
    DocumentOpened { document: PathBuf },
    /// Tabs were closed.
    TabsClosed { tabs: Vec<ClosedTab> },
    /// An editor moved to a different view column.
    ViewColumnChanged,
    /// The tab-group structure changed (a group opened, closed, or moved).
    TabGroupsChanged,
    /// The configuration store changed; `affected` carries the changed
    /// setting names.
    ConfigurationChanged { affected: Vec<String> },
}

/// The `SessionActor` implements the related-files view core.
///
/// Front-ends contain no reconciliation logic; they forward editor events to
/// the actor's input channel and service the `EditorHost` calls the actor
/// makes in response. The actor processes one message at a time, so the
/// ordering constraints between the handlers are explicit in each handler's
/// body rather than spread over host callback registration order.
pub struct SessionActor {
    pub tx: mpsc::UnboundedSender<SessionMessage>,
}

impl SessionActor {
    /// Launch the session actor and return a handle to it
    pub fn launch(
        host: Box<dyn EditorHost>,
        search: Box<dyn FileSearch>,
        settings: SettingsManager,
        state_store: StateStore,
        workspace_roots: Vec<PathBuf>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (event_sender, event_rx) = EventSender::new();

        tokio::task::spawn_local(async move {
            let state = ActorState {
                event_sender,
                host,
                search,
                settings,
                state_store,
                workspace_roots,
                view: ViewState::default(),
                recompute_after_groups_change: false,
            };
            run_actor(state, rx).await;
        });

        (SessionActor { tx }, event_rx)
    }

    pub fn open_related_files(&self, document: Option<PathBuf>) -> Result<()> {
        self.tx.send(SessionMessage::OpenRelatedFiles { document })?;
        Ok(())
    }

    pub fn editor_changed(&self, document: Option<PathBuf>) -> Result<()> {
        self.tx.send(SessionMessage::EditorChanged { document })?;
        Ok(())
    }

    pub fn document_opened(&self, document: PathBuf) -> Result<()> {
        self.tx.send(SessionMessage::DocumentOpened { document })?;
        Ok(())
    }

    pub fn tabs_closed(&self, tabs: Vec<ClosedTab>) -> Result<()> {
        self.tx.send(SessionMessage::TabsClosed { tabs })?;
        Ok(())
    }

    pub fn view_column_changed(&self) -> Result<()> {
        self.tx.send(SessionMessage::ViewColumnChanged)?;
        Ok(())
    }

    pub fn tab_groups_changed(&self) -> Result<()> {
        self.tx.send(SessionMessage::TabGroupsChanged)?;
        Ok(())
    }

    pub fn configuration_changed(&self, affected: Vec<String>) -> Result<()> {
        self.tx.send(SessionMessage::ConfigurationChanged { affected })?;
        Ok(())
    }
}

struct ActorState {
    event_sender: EventSender,
    host: Box<dyn EditorHost>,
    search: Box<dyn FileSearch>,
    settings: SettingsManager,
    state_store: StateStore,
    workspace_roots: Vec<PathBuf>,
    view: ViewState,
    /// Armed by a view-column change: recompute the pane once more when the
    /// next tab-group change lands, then stop.
    recompute_after_groups_change: bool,
}

// Actor implementation as free functions
async fn run_actor(mut state: ActorState, mut rx: mpsc::UnboundedReceiver<SessionMessage>) {
    info!("SessionActor started");

    if let Err(e) = initialise(&mut state).await {
        error!(?e, "Initialisation failed");
        state
            .event_sender
            .send(SessionEvent::Error(format!("Error: {e:?}")));
    }

    while let Some(message) = rx.recv().await {
        state.event_sender.set_busy(true);
        if let Err(e) = dispatch(&mut state, message).await {
            error!(?e, "Error processing session message");
            state
                .event_sender
                .send(SessionEvent::Error(format!("Error: {e:?}")));
        }
        state.event_sender.set_busy(false);
    }
}

async fn dispatch(state: &mut ActorState, message: SessionMessage) -> Result<()> {
    match message {
        SessionMessage::OpenRelatedFiles { document } => open_related_files(state, document).await,
        SessionMessage::EditorChanged { document } => handle_editor_changed(state, document).await,
        SessionMessage::DocumentOpened { document } => {
            handle_document_opened(state, document).await
        }
        SessionMessage::TabsClosed { tabs } => handle_tabs_closed(state, tabs).await,
        SessionMessage::ViewColumnChanged => handle_view_column_changed(state).await,
        SessionMessage::TabGroupsChanged => handle_tab_groups_changed(state).await,
        SessionMessage::ConfigurationChanged { affected } => {
            handle_configuration_changed(state, affected).await
        }
    }
}

/// Load or create the marker file, seed the pane identity from any column
/// already hosting the marker, and surface the one-time notice.
async fn initialise(state: &mut ActorState) -> Result<()> {
    let marker = state.state_store.get_or_insert_with(MARKER_URL_KEY, || {
        let path = create_marker_file(MARKER_DIR, MARKER_FILE_NAME)?;
        Ok(path.to_string_lossy().into_owned())
    })?;
    let marker = PathBuf::from(marker);

    // The stored path survives across sessions but temp cleaners may have
    // removed the file itself; restore it at the same location.
    if !marker.exists() {
        if let Some(parent) = marker.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        std::fs::write(&marker, "")
            .with_context(|| format!("Failed to restore marker file at {marker:?}"))?;
    }
    state.view.marker = Some(marker.clone());

    let groups = state.host.tab_groups().await?;
    let seeded = marker_columns(&groups, &state.view)
        .first()
        .copied()
        .unwrap_or_else(|| last_column(&groups).next());
    set_pane(state, Some(seeded));

    if state.settings.settings().show_initialised {
        let choice = state
            .host
            .show_info(INITIALISED_NOTICE, &[DO_NOT_SHOW_AGAIN])
            .await?;
        if choice.as_deref() == Some(DO_NOT_SHOW_AGAIN) {
            state.settings.update_value(
                SettingKey::ShowInitialised.as_ref(),
                toml::Value::Boolean(false),
            );
            state.settings.save()?;
        }
    }

    state
        .event_sender
        .send(SessionEvent::Initialised { marker_file: marker });
    Ok(())
}

async fn handle_editor_changed(state: &mut ActorState, document: Option<PathBuf>) -> Result<()> {
    match state.settings.settings().activation_mode {
        ActivationMode::OnEditorChange => open_related_files(state, document).await,
        ActivationMode::Manual => Ok(()),
    }
}

/// Entry point of a reconciliation cycle: decide whether the document
/// establishes a new primary, and if so rebuild the pane around it.
async fn open_related_files(state: &mut ActorState, document: Option<PathBuf>) -> Result<()> {
    let document = match document {
        Some(document) => document,
        None => match state.host.active_document().await? {
            Some(document) => document,
            None => return Ok(()),
        },
    };

    // A pane that closed just before this event may still be settling.
    // Re-deriving the identity from the live layout here makes the
    // classification below order-independent.
    let groups = state.host.tab_groups().await?;
    if let Some(column) = locate_pane(&groups, &state.view) {
        set_pane(state, Some(column));
    }

    // A related file re-shown inside the pane is not a new primary; the same
    // file opened by the user in another column is.
    let active = state.host.active_column().await?;
    let reshown_related =
        state.view.is_related(&document) && active.is_some() && active == state.view.pane;

    let new_primary = !state.view.is_primary(&document)
        && !state.view.is_marker(&document)
        && !reshown_related;

    if new_primary {
        handle_file_open(state, &document).await?;
    }
    Ok(())
}

async fn handle_file_open(state: &mut ActorState, document: &Path) -> Result<()> {
    debug!(document = %document.display(), "establishing new primary file");
    state.view.set_primary(document);

    // Without a marker reference the pane cannot be identified; skip.
    let Some(marker) = state.view.marker.clone() else {
        return Ok(());
    };

    // Show the marker before the related set mutates: pane location depends
    // on the previous membership, and this re-establishes the pane when the
    // layout lost it.
    let pane = match state.view.pane {
        Some(pane) => pane,
        None => {
            let groups = state.host.tab_groups().await?;
            last_column(&groups).next()
        }
    };
    set_pane(state, Some(pane));
    state
        .host
        .show_document(&marker, ShowOptions::pinned(pane))
        .await?;

    state.view.clear_related();

    // Close everything in the pane except the marker.
    let groups = state.host.tab_groups().await?;
    if let Some(group) = groups.iter().find(|g| g.column == pane) {
        let foreign: Vec<TabRef> = group
            .tabs
            .iter()
            .filter_map(|tab| tab.path.clone())
            .filter(|path| !state.view.is_marker(path))
            .map(|path| TabRef { column: pane, path })
            .collect();
        if !foreign.is_empty() {
            state.host.close_tabs(&foreign).await?;
        }
    }

    let settings = state.settings.settings();
    let related = match related::resolve(
        document,
        &settings,
        &state.workspace_roots,
        state.search.as_ref(),
    ) {
        Ok(related) => related,
        Err(ResolveError::NoWorkspace) => {
            // The cycle aborts here; the cleared related set is the safe
            // idle-equivalent fallback.
            state.host.show_error(NO_WORKSPACE_MESSAGE).await?;
            return Ok(());
        }
        Err(ResolveError::Search(e)) => return Err(e),
    };

    for path in &related {
        state.view.track_related(path);
        state
            .host
            .show_document(path, ShowOptions::pinned(pane))
            .await?;
    }

    state.event_sender.send(SessionEvent::RelatedFilesOpened {
        primary: state.view.primary.clone().unwrap_or_default(),
        related: related
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect(),
    });
    Ok(())
}

/// Keep non-related files out of the pane: a document that opened while the
/// pane's group was active is relocated to a fallback column; otherwise the
/// freshly computed column is adopted as the pane identity (the pane may
/// have moved since it was last tracked).
async fn handle_document_opened(state: &mut ActorState, document: PathBuf) -> Result<()> {
    let groups = state.host.tab_groups().await?;
    let current = locate_pane(&groups, &state.view).or(state.view.pane);

    let active = state.host.active_column().await?;
    if active.is_some() && active == current {
        let column = if state.view.pane != Some(ViewColumn::ONE) {
            ViewColumn::ONE
        } else {
            ViewColumn::TWO
        };
        state
            .host
            .show_document(
                &document,
                ShowOptions {
                    column,
                    preserve_focus: false,
                    preview: false,
                },
            )
            .await?;
    } else {
        set_pane(state, current);
    }
    Ok(())
}

/// Keep tracked files from leaving the pane: a closed marker or related file
/// is reopened in the tracked pane. A marker closure may mean a whole group
/// went away, shifting the pane's position; in that case the identity is
/// recomputed before reopening, and the related files are closed and
/// re-shown afterwards to restore their canonical grouping.
async fn handle_tabs_closed(state: &mut ActorState, tabs: Vec<ClosedTab>) -> Result<()> {
    for closed in tabs {
        let locked = state.view.is_marker(&closed.path) || state.view.is_related(&closed.path);
        if !locked {
            continue;
        }

        if state.view.is_marker(&closed.path) {
            let visible = state.host.visible_editor_count().await?;
            if visible as u32 > closed.column.0 {
                let groups = state.host.tab_groups().await?;
                set_pane(state, Some(last_column(&groups)));
            }
        }

        let Some(pane) = state.view.pane else {
            continue;
        };
        state
            .host
            .show_document(&closed.path, ShowOptions::pinned(pane))
            .await?;

        if !state.view.is_marker(&closed.path) {
            continue;
        }

        // The marker is back; regroup the related files around it.
        let groups = state.host.tab_groups().await?;
        let Some(group) = groups.iter().find(|g| g.column == pane) else {
            continue;
        };
        let related: Vec<PathBuf> = group
            .tabs
            .iter()
            .filter_map(|tab| tab.path.clone())
            .filter(|path| state.view.is_related(path))
            .collect();
        if related.is_empty() {
            continue;
        }

        let refs: Vec<TabRef> = related
            .iter()
            .cloned()
            .map(|path| TabRef { column: pane, path })
            .collect();
        state.host.close_tabs(&refs).await?;
        for path in &related {
            state
                .host
                .show_document(path, ShowOptions::pinned(pane))
                .await?;
        }
    }
    Ok(())
}

async fn handle_view_column_changed(state: &mut ActorState) -> Result<()> {
    // Degenerate single-pane case: with one visible editor there is no group
    // to classify, so pin the identity to the fixed fallback.
    if state.host.visible_editor_count().await? == 1 {
        set_pane(state, Some(ViewColumn::TWO));
        return Ok(());
    }

    let groups = state.host.tab_groups().await?;
    set_pane(state, locate_pane(&groups, &state.view));

    // The host reports a second, delayed-settling layout state after this
    // notification; recompute once more when it lands.
    state.recompute_after_groups_change = true;
    Ok(())
}

async fn handle_tab_groups_changed(state: &mut ActorState) -> Result<()> {
    if !state.recompute_after_groups_change {
        return Ok(());
    }
    state.recompute_after_groups_change = false;

    let groups = state.host.tab_groups().await?;
    set_pane(state, locate_pane(&groups, &state.view));
    Ok(())
}

async fn handle_configuration_changed(state: &mut ActorState, affected: Vec<String>) -> Result<()> {
    state.settings.reload()?;

    // Only the activation mode requires a restart; everything else is read
    // through on the next cycle.
    if affected
        .iter()
        .any(|name| name == SettingKey::ActivationMode.as_ref())
    {
        let choice = state
            .host
            .show_warning(RESTART_NOTICE, &[RESTART_ACTION])
            .await?;
        if choice.as_deref() == Some(RESTART_ACTION) {
            state.host.execute_command(RELOAD_WINDOW_COMMAND).await?;
        }
    }
    Ok(())
}

fn set_pane(state: &mut ActorState, column: Option<ViewColumn>) {
    if state.view.pane == column {
        return;
    }
    debug!(?column, "related-files pane changed");
    state.view.pane = column;
    state
        .event_sender
        .send(SessionEvent::PaneChanged { column });
}
