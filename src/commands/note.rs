// Page commands - open, edit, save, create and delete documents

use tauri::State;

use super::common::{CommandReply, NotesState};
use crate::store::{NewPage, Outcome, StoreSnapshot};

#[tauri::command]
pub async fn open_file(state: State<'_, NotesState>, path: String) -> Result<CommandReply, String> {
    tracing::info!("[open_file] Called with path: {}", path);
    let outcome = state.store.open_file(&path).await.map_err(|e| e.to_string())?;
    Ok(CommandReply::of(outcome, &state.store))
}

#[tauri::command]
pub async fn pick_and_open_file(state: State<'_, NotesState>) -> Result<CommandReply, String> {
    tracing::info!("[pick_and_open_file] Called");
    let outcome = state.store.pick_and_open_file().await;
    Ok(CommandReply::of(outcome, &state.store))
}

/// Editor keystrokes; returns only the dirty flag to keep the payload small
#[tauri::command]
pub fn update_content(state: State<'_, NotesState>, content: String) -> bool {
    state.store.update_content(&content);
    state.store.state().dirty
}

#[tauri::command]
pub async fn save_current_file(state: State<'_, NotesState>) -> Result<CommandReply, String> {
    tracing::info!("[save_current_file] Called");
    let outcome = state.store.save_current_file().await;
    Ok(CommandReply::of(outcome, &state.store))
}

#[tauri::command]
pub async fn save_file_as(state: State<'_, NotesState>) -> Result<CommandReply, String> {
    tracing::info!("[save_file_as] Called");
    let outcome = state.store.save_file_as().await;
    Ok(CommandReply::of(outcome, &state.store))
}

#[tauri::command]
pub fn create_new_file(state: State<'_, NotesState>, parent: Option<String>) -> CommandReply<NewPage> {
    tracing::info!("[create_new_file] Called with parent: {:?}", parent);
    let page = state.store.create_new_file(parent.as_deref());
    CommandReply::with_value(Outcome::Completed, &state.store, page)
}

#[tauri::command]
pub async fn delete_file(state: State<'_, NotesState>, path: String) -> Result<CommandReply, String> {
    tracing::info!("[delete_file] Called with path: {}", path);
    let outcome = state.store.delete_file(&path).await.map_err(|e| e.to_string())?;
    Ok(CommandReply::of(outcome, &state.store))
}

#[tauri::command]
pub fn clear_error(state: State<'_, NotesState>) -> StoreSnapshot {
    state.store.clear_error();
    state.store.snapshot()
}
