use crate::host::{EditorHost, ShowOptions, Tab, TabGroup, TabRef, ViewColumn};
use anyhow::Result;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A recorded editor operation, for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Show {
        path: PathBuf,
        options: ShowOptions,
    },
    Close(Vec<TabRef>),
    Error(String),
    Command(String),
}

#[derive(Default)]
struct MockHostState {
    groups: Vec<TabGroup>,
    active_column: Option<ViewColumn>,
    active_document: Option<PathBuf>,
    visible_editors: Option<usize>,
    info_answers: VecDeque<Option<String>>,
    warning_answers: VecDeque<Option<String>>,
    calls: Vec<HostCall>,
}

/// In-memory editor host for tests.
///
/// Show/close operations are applied to the mock tab-group layout so the
/// actor's layout queries observe its own effects mid-cycle, the way a real
/// editor would. Clones share state, so a test can hold a handle while the
/// actor owns a boxed clone.
#[derive(Clone, Default)]
pub struct MockHost {
    inner: Arc<Mutex<MockHostState>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_groups(&self, groups: Vec<TabGroup>) {
        self.inner.lock().unwrap().groups = groups;
    }

    pub fn set_active_column(&self, column: Option<ViewColumn>) {
        self.inner.lock().unwrap().active_column = column;
    }

    pub fn set_active_document(&self, path: Option<PathBuf>) {
        self.inner.lock().unwrap().active_document = path;
    }

    /// Override the visible editor count. When unset, the group count is
    /// reported.
    pub fn set_visible_editors(&self, count: Option<usize>) {
        self.inner.lock().unwrap().visible_editors = count;
    }

    pub fn push_info_answer(&self, answer: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .info_answers
            .push_back(answer.map(str::to_string));
    }

    pub fn push_warning_answer(&self, answer: Option<&str>) {
        self.inner
            .lock()
            .unwrap()
            .warning_answers
            .push_back(answer.map(str::to_string));
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn groups(&self) -> Vec<TabGroup> {
        self.inner.lock().unwrap().groups.clone()
    }

    /// The tabs currently open in the given column.
    pub fn tabs_in(&self, column: ViewColumn) -> Vec<PathBuf> {
        self.inner
            .lock()
            .unwrap()
            .groups
            .iter()
            .find(|g| g.column == column)
            .map(|g| g.tabs.iter().filter_map(|t| t.path.clone()).collect())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait(?Send)]
impl EditorHost for MockHost {
    async fn show_document(&self, path: &Path, options: ShowOptions) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(HostCall::Show {
            path: path.to_path_buf(),
            options,
        });

        let group = match state.groups.iter_mut().find(|g| g.column == options.column) {
            Some(group) => group,
            None => {
                state.groups.push(TabGroup {
                    column: options.column,
                    tabs: Vec::new(),
                });
                state.groups.sort_by_key(|g| g.column);
                state
                    .groups
                    .iter_mut()
                    .find(|g| g.column == options.column)
                    .unwrap()
            }
        };

        if !group.tabs.iter().any(|t| t.path.as_deref() == Some(path)) {
            group.tabs.push(Tab::text(path));
        }
        Ok(())
    }

    async fn close_tabs(&self, tabs: &[TabRef]) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(HostCall::Close(tabs.to_vec()));

        for tab in tabs {
            if let Some(group) = state.groups.iter_mut().find(|g| g.column == tab.column) {
                group
                    .tabs
                    .retain(|t| t.path.as_deref() != Some(tab.path.as_path()));
            }
        }
        state.groups.retain(|g| !g.tabs.is_empty());
        Ok(())
    }

    async fn tab_groups(&self) -> Result<Vec<TabGroup>> {
        Ok(self.inner.lock().unwrap().groups.clone())
    }

    async fn active_column(&self) -> Result<Option<ViewColumn>> {
        Ok(self.inner.lock().unwrap().active_column)
    }

    async fn active_document(&self) -> Result<Option<PathBuf>> {
        Ok(self.inner.lock().unwrap().active_document.clone())
    }

    async fn visible_editor_count(&self) -> Result<usize> {
        let state = self.inner.lock().unwrap();
        Ok(state.visible_editors.unwrap_or(state.groups.len()))
    }

    async fn show_info(&self, _message: &str, _actions: &[&str]) -> Result<Option<String>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .info_answers
            .pop_front()
            .flatten())
    }

    async fn show_warning(&self, _message: &str, _actions: &[&str]) -> Result<Option<String>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .warning_answers
            .pop_front()
            .flatten())
    }

    async fn show_error(&self, message: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(HostCall::Error(message.to_string()));
        Ok(())
    }

    async fn execute_command(&self, command: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(HostCall::Command(command.to_string()));
        Ok(())
    }
}
