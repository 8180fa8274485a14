// Models module for the Quillnote note store
// Serialized fields use camelCase for the webview

pub mod config;
pub mod document;
pub mod entry;

pub use config::{ProjectEntry, Settings};
pub use document::{DocumentRef, UNSAVED_PREFIX};
pub use entry::{EntryKind, FileSystemEntry};
