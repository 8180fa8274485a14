// Settings commands

use tauri::State;

use super::common::NotesState;
use crate::models::Settings;

#[tauri::command]
pub fn get_settings(state: State<'_, NotesState>) -> Settings {
    tracing::debug!("[get_settings] Called");
    state.config.settings()
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsInput {
    pub new_page_title: Option<String>,
    pub new_page_body: Option<String>,
    pub default_extension: Option<String>,
    pub default_project: Option<String>,
    pub list_depth: Option<usize>,
    pub log_level: Option<String>,
}

#[tauri::command]
pub fn update_settings(state: State<'_, NotesState>, input: UpdateSettingsInput) -> Result<Settings, String> {
    tracing::info!("[update_settings] Called");

    let mut settings = state.config.settings();
    if let Some(title) = input.new_page_title {
        tracing::debug!("[update_settings] Setting newPageTitle to: {}", title);
        settings.new_page_title = title;
    }
    if let Some(body) = input.new_page_body {
        settings.new_page_body = body;
    }
    if let Some(ext) = input.default_extension {
        let ext = ext.trim_start_matches('.').to_string();
        if ext.is_empty() {
            return Err("Default extension can't be empty".to_string());
        }
        settings.default_extension = ext;
    }
    if let Some(dir) = input.default_project {
        settings.default_project = Some(dir).filter(|d| !d.is_empty());
    }
    if let Some(depth) = input.list_depth {
        // Takes effect for the gateway on next start
        settings.list_depth = depth.max(1);
    }
    if let Some(level) = input.log_level {
        settings.log_level = level;
    }

    state.config.update_settings(settings.clone()).map_err(|e| e.to_string())?;
    state.store.update_settings(settings.clone());
    tracing::info!("[update_settings] SUCCESS");
    Ok(settings)
}
