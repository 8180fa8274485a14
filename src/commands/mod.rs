// Commands module - Tauri command handlers over the note store
// Submodules must be public for Tauri's generate_handler! macro

pub mod common;
pub mod folder;
pub mod note;
pub mod prompt;
pub mod settings;
pub mod workspace;

pub use common::{CommandReply, DesktopStore, NotesState};
