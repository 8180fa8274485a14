// Config persistence for Quillnote
// Global settings live in ~/.quillnote/config.md: YAML frontmatter for the
// settings, a markdown table of recently opened projects in the body.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{StoreError, StoreResult};
use crate::models::{ProjectEntry, Settings};

// ============================================
// PATH HELPERS
// ============================================

/// Global config directory (~/.quillnote/)
pub fn globalConfigDir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".quillnote"))
}

pub fn globalConfigPath() -> Option<PathBuf> {
    globalConfigDir().map(|dir| dir.join("config.md"))
}

/// Directory for rolling log files
pub fn logDir() -> Option<PathBuf> {
    globalConfigDir().map(|dir| dir.join("logs"))
}

/// Project folder used when "New Note" is pressed with nothing open
pub fn defaultProjectDir() -> Option<String> {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("Quillnote").to_string_lossy().to_string())
}

// ============================================
// FRONTMATTER PARSING
// ============================================

/// Parse YAML frontmatter from markdown content
pub fn parseFrontmatter<T: serde::de::DeserializeOwned>(content: &str) -> Option<(T, String)> {
    let content = content.trim();
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let yaml = rest[..end].trim();
    let body = rest[end + 4..].trim().to_string();

    let frontmatter: T = serde_yaml::from_str(yaml).ok()?;
    Some((frontmatter, body))
}

/// Serialize frontmatter + body to markdown
pub fn toMarkdown<T: serde::Serialize>(frontmatter: &T, body: &str) -> StoreResult<String> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

/// Parse the `| path | name | lastOpened |` table. Rows whose path no longer
/// exists are dropped.
fn parseProjectsTable(body: &str) -> Vec<ProjectEntry> {
    let mut projects = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        if !line.starts_with('|') || line.starts_with("|--") {
            continue;
        }
        let parts: Vec<&str> = line.split('|').map(str::trim).filter(|s| !s.is_empty()).collect();
        if parts.len() < 3 || parts[0] == "path" {
            continue;
        }
        if !Path::new(parts[0]).exists() {
            tracing::debug!("[parseProjectsTable] Dropping missing project {}", parts[0]);
            continue;
        }
        projects.push(ProjectEntry {
            path: parts[0].to_string(),
            name: parts[1].to_string(),
            last_opened: parts[2].parse::<i64>().unwrap_or(0),
        });
    }

    projects
}

fn projectsTable(projects: &[ProjectEntry]) -> String {
    let mut body = String::from("# Projects\n\n| path | name | lastOpened |\n|------|------|------------|\n");
    for p in projects {
        body.push_str(&format!("| {} | {} | {} |\n", p.path, p.name, p.last_opened));
    }
    body
}

// ============================================
// CONFIG STORE
// ============================================

pub struct ConfigStore {
    path: PathBuf,
    settings: RwLock<Settings>,
    projects: RwLock<Vec<ProjectEntry>>,
}

impl ConfigStore {
    /// Load the config at `path`. A missing or unreadable file yields defaults.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (settings, projects) = loadConfig(&path);
        tracing::info!("[ConfigStore::at] Loaded {} projects from {:?}", projects.len(), path);
        Self {
            path,
            settings: RwLock::new(settings),
            projects: RwLock::new(projects),
        }
    }

    /// Load the global config from the home directory
    pub fn open_default() -> StoreResult<Self> {
        let path = globalConfigPath().ok_or_else(|| StoreError::Config("no home directory".to_string()))?;
        Ok(Self::at(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn update_settings(&self, settings: Settings) -> StoreResult<()> {
        *self.settings.write() = settings;
        self.save()
    }

    /// Recent projects, most recently opened first
    pub fn projects(&self) -> Vec<ProjectEntry> {
        let mut projects = self.projects.read().clone();
        projects.sort_by(|a, b| b.last_opened.cmp(&a.last_opened));
        projects
    }

    /// Record `path` as the current project and bump its lastOpened
    pub fn remember_project(&self, path: &str) -> StoreResult<()> {
        let now = chrono::Utc::now().timestamp_millis();
        {
            let mut projects = self.projects.write();
            match projects.iter_mut().find(|p| p.path == path) {
                Some(existing) => existing.last_opened = now,
                None => {
                    let name = Path::new(path)
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Project".to_string());
                    projects.push(ProjectEntry { path: path.to_string(), name, last_opened: now });
                }
            }
        }
        self.settings.write().current_project = Some(path.to_string());
        self.save()
    }

    pub fn forget_project(&self, path: &str) -> StoreResult<()> {
        self.projects.write().retain(|p| p.path != path);
        {
            let mut settings = self.settings.write();
            if settings.current_project.as_deref() == Some(path) {
                settings.current_project = None;
            }
        }
        self.save()
    }

    pub fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = {
            let settings = self.settings.read();
            let projects = self.projects.read();
            toMarkdown(&*settings, &projectsTable(&projects))?
        };
        fs::write(&self.path, content)?;
        tracing::debug!("[ConfigStore::save] Wrote {:?}", self.path);
        Ok(())
    }
}

fn loadConfig(path: &Path) -> (Settings, Vec<ProjectEntry>) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            tracing::info!("[loadConfig] No config at {:?}, using defaults", path);
            return (Settings::default(), Vec::new());
        }
    };

    let (settings, body) = parseFrontmatter::<Settings>(&content).unwrap_or_else(|| {
        tracing::warn!("[loadConfig] Failed to parse frontmatter, using defaults");
        (Settings::default(), String::new())
    });
    let projects = parseProjectsTable(&body);
    (settings, projects)
}
