// File access gateway contract
// The note store never touches the file system directly; every read, write,
// listing, dialog and prompt goes through an implementation of FileGateway.

use std::future::Future;

use crate::models::FileSystemEntry;

/// Result of a gateway call. Gateways never panic or return errors across
/// this boundary: failures arrive as `Failed` with a message, and a user
/// dismissing a dialog or prompt arrives as `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply<T> {
    Done(T),
    Cancelled,
    Failed(String),
}

impl<T> GatewayReply<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayReply<U> {
        match self {
            Self::Done(value) => GatewayReply::Done(f(value)),
            Self::Cancelled => GatewayReply::Cancelled,
            Self::Failed(message) => GatewayReply::Failed(message),
        }
    }
}

impl<T> From<std::io::Result<T>> for GatewayReply<T> {
    fn from(value: std::io::Result<T>) -> Self {
        match value {
            Ok(v) => Self::Done(v),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// A file read from disk. `path` is the path as normalized by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub path: String,
    pub content: String,
}

/// A directory listing. `path` is the listed directory (the picked one when
/// the picker was used).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: String,
    pub items: Vec<FileSystemEntry>,
}

/// Where write_file puts the content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    /// Write straight to this path
    Path(String),
    /// Ask the user for a destination, optionally pre-filled
    Dialog { suggested: Option<String> },
}

pub trait FileGateway: Send + Sync {
    /// Show an open-file dialog
    fn pick_file(&self) -> impl Future<Output = GatewayReply<String>> + Send;

    fn read_file(&self, path: &str) -> impl Future<Output = GatewayReply<FileContents>> + Send;

    /// Write text content; returns the path actually written
    fn write_file(&self, target: WriteTarget, content: &str) -> impl Future<Output = GatewayReply<String>> + Send;

    /// Write binary content (image assets); returns the path actually written
    fn write_bytes(&self, path: &str, bytes: &[u8]) -> impl Future<Output = GatewayReply<String>> + Send;

    /// List `path`, or show a folder picker and list the chosen folder when None
    fn list_directory(&self, path: Option<&str>) -> impl Future<Output = GatewayReply<Listing>> + Send;

    fn create_directory(&self, path: &str) -> impl Future<Output = GatewayReply<String>> + Send;

    fn delete_file(&self, path: &str) -> impl Future<Output = GatewayReply<()>> + Send;

    /// Ask the user for a line of text
    fn prompt_text(&self, message: &str, default_value: &str) -> impl Future<Output = GatewayReply<String>> + Send;

    fn path_separator(&self) -> impl Future<Output = char> + Send;
}
