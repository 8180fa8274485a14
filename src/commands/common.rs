// Common helpers for commands

use serde::Serialize;
use std::sync::Arc;

use super::prompt::DialogPrompter;
use crate::local::LocalGateway;
use crate::storage::ConfigStore;
use crate::store::{NoteStore, Outcome, StoreSnapshot};

pub type DesktopStore = NoteStore<LocalGateway<DialogPrompter>>;

/// Managed Tauri state
pub struct NotesState {
    pub store: Arc<DesktopStore>,
    pub config: Arc<ConfigStore>,
}

impl NotesState {
    /// Persist the project root as the current/recent project, if there is one
    pub fn remember_root(&self) {
        if let Some(root) = self.store.project_root() {
            if let Err(e) = self.config.remember_project(&root) {
                tracing::warn!("[remember_root] Could not save recent project {}: {}", root, e);
            }
        }
    }
}

/// Outcome of a store operation plus the state after it
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReply<T: Serialize = ()> {
    pub outcome: Outcome,
    pub state: StoreSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl CommandReply<()> {
    pub fn of(outcome: Outcome, store: &DesktopStore) -> Self {
        Self { outcome, state: store.snapshot(), value: None }
    }
}

impl<T: Serialize> CommandReply<T> {
    pub fn with_value(outcome: Outcome, store: &DesktopStore, value: T) -> Self {
        Self { outcome, state: store.snapshot(), value: Some(value) }
    }
}
