// Notebook commands - notebooks are directories directly below the project root

use tauri::State;

use super::common::{CommandReply, NotesState};
use crate::models::FileSystemEntry;

#[tauri::command]
pub fn get_notebooks(state: State<'_, NotesState>) -> Vec<FileSystemEntry> {
    let notebooks = state.store.notebooks();
    tracing::debug!("[get_notebooks] Found {} notebooks", notebooks.len());
    notebooks
}

#[tauri::command]
pub fn get_pages(state: State<'_, NotesState>, notebook: Option<String>) -> Vec<FileSystemEntry> {
    let pages = match notebook.as_deref() {
        Some(nb) => state.store.pages_for_notebook(Some(nb)),
        None => state.store.loose_pages(),
    };
    tracing::debug!("[get_pages] notebook: {:?}, {} pages", notebook, pages.len());
    pages
}

/// Prompts for a name and creates the notebook under `root`
/// (the current project root when omitted)
#[tauri::command]
pub async fn create_new_notebook(state: State<'_, NotesState>, root: Option<String>) -> Result<CommandReply, String> {
    tracing::info!("[create_new_notebook] Called with root: {:?}", root);
    let root = root.or_else(|| state.store.project_root());
    let outcome = state
        .store
        .create_new_notebook(root.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    Ok(CommandReply::of(outcome, &state.store))
}
