// Document reference model
// A document is either a file on disk or an in-memory page that was never saved

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key prefix the view layer routes unsaved pages on
pub const UNSAVED_PREFIX: &str = "unsaved-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DocumentRef {
    Saved {
        path: String,
    },
    #[serde(rename_all = "camelCase")]
    Unsaved {
        id: String,
        /// Notebook the page will be saved into, None for a loose page
        notebook: Option<String>,
        created_at: i64,
    },
}

impl DocumentRef {
    pub fn saved(path: impl Into<String>) -> Self {
        Self::Saved { path: path.into() }
    }

    /// New unsaved reference. The uuid keeps two references distinct even
    /// when created within the same millisecond.
    pub fn unsaved(notebook: Option<String>) -> Self {
        Self::Unsaved {
            id: Uuid::new_v4().simple().to_string(),
            notebook,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn saved_path(&self) -> Option<&str> {
        match self {
            Self::Saved { path } => Some(path),
            Self::Unsaved { .. } => None,
        }
    }

    /// Stable string key: the path for saved documents,
    /// `unsaved-<millis>-<id>` otherwise
    pub fn key(&self) -> String {
        match self {
            Self::Saved { path } => path.clone(),
            Self::Unsaved { id, created_at, .. } => format!("{}{}-{}", UNSAVED_PREFIX, created_at, id),
        }
    }
}
