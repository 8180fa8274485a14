// Desktop dialogs for the local gateway
// File pickers use native rfd dialogs; text prompts are rendered by the
// webview, which receives a "prompt-text" event and replies through the
// answer_prompt command.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tauri::{AppHandle, Emitter, State};
use tokio::sync::oneshot;

use rfd::FileDialog;

use super::common::NotesState;
use crate::local::Prompter;

pub const PROMPT_EVENT: &str = "prompt-text";

#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptRequest {
    id: u64,
    message: String,
    default_value: String,
}

pub struct DialogPrompter {
    app: AppHandle,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<Option<String>>>>,
}

impl DialogPrompter {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Deliver the webview's answer to a pending prompt
    pub fn answer(&self, id: u64, value: Option<String>) -> bool {
        match self.pending.lock().remove(&id) {
            Some(tx) => tx.send(value).is_ok(),
            None => {
                tracing::warn!("[DialogPrompter::answer] No pending prompt {}", id);
                false
            }
        }
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().to_string()
}

/// Run a blocking native dialog off the async runtime
async fn run_dialog<F>(dialog: F) -> Option<String>
where
    F: FnOnce() -> Option<PathBuf> + Send + 'static,
{
    match tokio::task::spawn_blocking(dialog).await {
        Ok(picked) => picked.map(path_string),
        Err(e) => {
            tracing::error!("[run_dialog] Dialog task failed: {}", e);
            None
        }
    }
}

impl Prompter for DialogPrompter {
    async fn pick_file(&self) -> Option<String> {
        tracing::debug!("[DialogPrompter::pick_file] Opening dialog");
        run_dialog(|| {
            FileDialog::new()
                .set_title("Open Note")
                .add_filter("Notes", &["md", "markdown", "txt"])
                .pick_file()
        })
        .await
    }

    async fn pick_folder(&self) -> Option<String> {
        tracing::debug!("[DialogPrompter::pick_folder] Opening dialog");
        run_dialog(|| FileDialog::new().set_title("Select Notes Folder").pick_folder()).await
    }

    async fn save_file(&self, suggested: Option<String>) -> Option<String> {
        tracing::debug!("[DialogPrompter::save_file] Suggested: {:?}", suggested);
        run_dialog(move || {
            let mut dialog = FileDialog::new().set_title("Save Note").add_filter("Markdown", &["md"]);
            if let Some(suggested) = suggested {
                let path = Path::new(&suggested);
                if let Some(dir) = path.parent().filter(|d| d.is_dir()) {
                    dialog = dialog.set_directory(dir);
                }
                if let Some(name) = path.file_name() {
                    dialog = dialog.set_file_name(name.to_string_lossy());
                }
            }
            dialog.save_file()
        })
        .await
    }

    async fn prompt_text(&self, message: &str, default_value: &str) -> Option<String> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let request = PromptRequest {
            id,
            message: message.to_string(),
            default_value: default_value.to_string(),
        };
        if let Err(e) = self.app.emit(PROMPT_EVENT, request) {
            tracing::error!("[DialogPrompter::prompt_text] Could not emit prompt: {}", e);
            self.pending.lock().remove(&id);
            return None;
        }
        rx.await.ok().flatten()
    }
}

#[tauri::command]
pub fn answer_prompt(state: State<'_, NotesState>, id: u64, value: Option<String>) -> bool {
    tracing::debug!("[answer_prompt] id: {}, answered: {}", id, value.is_some());
    state.store.gateway().prompter().answer(id, value)
}
