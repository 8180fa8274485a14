// Configuration models for Quillnote
// Global settings (config.md frontmatter) and the recent projects table

use serde::{Deserialize, Serialize};

/// All settings, stored as YAML frontmatter in the global config.md
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Title used for freshly created pages
    pub new_page_title: String,
    /// Placeholder body below the title of a new page
    pub new_page_body: String,
    /// Extension given to suggested file names, without the dot
    pub default_extension: String,
    /// Directory used by "New Note" when no project is open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_project: Option<String>,
    /// How many directory levels a listing flattens (1 = root only)
    pub list_depth: usize,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            new_page_title: "New Page".to_string(),
            new_page_body: "Start writing your ideas here!".to_string(),
            default_extension: "md".to_string(),
            default_project: None,
            current_project: None,
            list_depth: 2,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Content of a new page: a level-one heading followed by the placeholder body
    pub fn new_page_content(&self) -> String {
        format!("# {}\n\n{}", self.new_page_title, self.new_page_body)
    }
}

/// Recent project entry in the global config body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub path: String,
    pub name: String,
    pub last_opened: i64,
}
