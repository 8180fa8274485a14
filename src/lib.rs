// Quillnote - notes on the local file system, organised into notebooks
// (directories below a project root) and pages (files).
#![allow(non_snake_case)]

pub mod errors;
pub mod gateway;
pub mod local;
pub mod models;
pub mod paths;
pub mod storage;
pub mod store;

#[cfg(feature = "desktop")]
pub mod commands;

use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;

pub use errors::{StoreError, StoreResult};
pub use gateway::{FileContents, FileGateway, GatewayReply, Listing, WriteTarget};
pub use local::{LocalGateway, Prompter, ScriptedPrompter};
pub use models::{DocumentRef, EntryKind, FileSystemEntry, ProjectEntry, Settings};
pub use storage::ConfigStore;
pub use store::{ListTarget, NewPage, NoteStore, Outcome, SharedStore, StoreSnapshot, StoreState};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global tracing subscriber. Logs go to stderr and, when
/// `log_dir` is given, to a daily rolling file. `RUST_LOG` overrides `level`.
pub fn init_tracing(log_dir: Option<&Path>, level: &str) -> Result<(), String> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|error| error.to_string())?;
            let file_appender = tracing_appender::rolling::daily(dir, "quillnote.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = LOG_GUARD.set(guard);
            Some(fmt::layer().with_ansi(false).with_writer(non_blocking))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|error| error.to_string())
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;
    use tauri::Manager;

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            let config = storage::ConfigStore::open_default()?;
            let settings = config.settings();
            if let Err(e) = init_tracing(storage::logDir().as_deref(), &settings.log_level) {
                eprintln!("[setup] Logging unavailable: {}", e);
            }
            tracing::info!("[setup] Config loaded from {:?}", config.path());

            let prompter = commands::prompt::DialogPrompter::new(app.handle().clone());
            let gateway = LocalGateway::new(prompter).with_list_depth(settings.list_depth);
            let store = Arc::new(NoteStore::new(gateway, settings.clone(), std::path::MAIN_SEPARATOR));

            // Reopen the last project if it still exists
            if let Some(root) = settings.current_project.clone().filter(|p| Path::new(p).is_dir()) {
                tracing::info!("[setup] Reopening project {}", root);
                store.set_project_root(Some(&root));
                let store = store.clone();
                tauri::async_runtime::spawn(async move {
                    store.list_directory(ListTarget::ProjectRoot).await;
                });
            }

            app.manage(commands::NotesState { store, config: Arc::new(config) });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Project
            commands::workspace::get_state,
            commands::workspace::path_separator,
            commands::workspace::set_project_root,
            commands::workspace::list_directory,
            commands::workspace::get_recent_projects,
            commands::workspace::forget_project,
            commands::workspace::setup_default_project,
            commands::workspace::save_image,
            // Pages
            commands::note::open_file,
            commands::note::pick_and_open_file,
            commands::note::update_content,
            commands::note::save_current_file,
            commands::note::save_file_as,
            commands::note::create_new_file,
            commands::note::delete_file,
            commands::note::clear_error,
            // Notebooks
            commands::folder::get_notebooks,
            commands::folder::get_pages,
            commands::folder::create_new_notebook,
            // Prompts
            commands::prompt::answer_prompt,
            // Settings
            commands::settings::get_settings,
            commands::settings::update_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
