// Project commands - project root, listings and recent projects

use tauri::State;

use super::common::{CommandReply, NotesState};
use crate::models::ProjectEntry;
use crate::store::{ListTarget, Outcome, StoreSnapshot};

#[tauri::command]
pub fn get_state(state: State<'_, NotesState>) -> StoreSnapshot {
    state.store.snapshot()
}

#[tauri::command]
pub fn path_separator(state: State<'_, NotesState>) -> char {
    state.store.separator()
}

#[tauri::command]
pub fn set_project_root(state: State<'_, NotesState>, path: Option<String>) -> StoreSnapshot {
    tracing::info!("[set_project_root] Called with path: {:?}", path);
    state.store.set_project_root(path.as_deref());
    state.remember_root();
    state.store.snapshot()
}

/// `pick` shows the folder picker; otherwise `path` is listed, or the
/// project root when no path is given.
#[tauri::command]
pub async fn list_directory(
    state: State<'_, NotesState>,
    path: Option<String>,
    pick: Option<bool>,
) -> Result<CommandReply, String> {
    tracing::info!("[list_directory] Called with path: {:?}, pick: {:?}", path, pick);

    let target = match (pick.unwrap_or(false), path) {
        (true, _) => ListTarget::Pick,
        (false, Some(p)) if !p.is_empty() => ListTarget::Path(p),
        _ => ListTarget::ProjectRoot,
    };
    let before = state.store.project_root();
    let outcome = state.store.list_directory(target).await;
    if state.store.project_root() != before {
        state.remember_root();
    }
    Ok(CommandReply::of(outcome, &state.store))
}

#[tauri::command]
pub fn get_recent_projects(state: State<'_, NotesState>) -> Vec<ProjectEntry> {
    let projects = state.config.projects();
    tracing::debug!("[get_recent_projects] {} projects", projects.len());
    projects
}

#[tauri::command]
pub fn forget_project(state: State<'_, NotesState>, path: String) -> Result<(), String> {
    tracing::info!("[forget_project] Called with path: {}", path);
    state.config.forget_project(&path).map_err(|e| e.to_string())
}

/// "New Note" from the sidebar
#[tauri::command]
pub async fn setup_default_project(state: State<'_, NotesState>) -> Result<CommandReply, String> {
    tracing::info!("[setup_default_project] Called");
    let outcome = state.store.setup_default_project().await.map_err(|e| e.to_string())?;
    state.remember_root();
    Ok(CommandReply::of(outcome, &state.store))
}

#[tauri::command]
pub async fn save_image(
    state: State<'_, NotesState>,
    name: String,
    bytes: Vec<u8>,
) -> Result<CommandReply<String>, String> {
    tracing::info!("[save_image] Called with name: {} ({} bytes)", name, bytes.len());
    let url = state.store.save_image(&name, &bytes).await.map_err(|e| e.to_string())?;
    Ok(match url {
        Some(url) => CommandReply::with_value(Outcome::Completed, &state.store, url),
        None => CommandReply { outcome: Outcome::Failed, state: state.store.snapshot(), value: None },
    })
}
