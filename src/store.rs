// Note store - the single authoritative state for project, listing and the
// open document. Every file mutation goes through here; the view layer only
// reads snapshots and calls operations.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::{StoreError, StoreResult};
use crate::gateway::{FileGateway, GatewayReply, WriteTarget};
use crate::models::{DocumentRef, FileSystemEntry, Settings};
use crate::paths;

/// Hidden directory (relative to the project root) that holds pasted images
pub const ASSETS_DIR: &str = ".assets";

const NOTEBOOK_PROMPT: &str = "Name of the new notebook";
const NOTEBOOK_DEFAULT_NAME: &str = "New Notebook";

// ============================================
// STATE
// ============================================

/// How an operation ended. Programmer misuse is reported as a StoreError
/// instead; I/O failures are also written to the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Completed,
    /// The user dismissed a dialog or prompt
    Cancelled,
    /// See `error` for the message
    Failed,
    /// A newer operation replaced the document or listing while this one
    /// was waiting on the gateway; its result was dropped
    Superseded,
}

/// What a listing call should list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTarget {
    /// Ask the user for a folder and adopt it as the project root
    Pick,
    /// List this directory
    Path(String),
    /// Re-list the project root (the picker is shown when there is none)
    ProjectRoot,
}

/// Identifier and display name of a page created in memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    pub key: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub project_root: Option<String>,
    pub entries: Vec<FileSystemEntry>,
    pub document: Option<DocumentRef>,
    pub content: String,
    pub original_content: String,
    pub dirty: bool,
    pub active_notebook: Option<String>,
    pub error: Option<String>,
    in_flight: usize,
    document_generation: u64,
    open_generation: u64,
    listing_generation: u64,
}

impl StoreState {
    /// True while any gateway call is in flight
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    fn clear_document(&mut self) {
        self.document = None;
        self.content.clear();
        self.original_content.clear();
        self.dirty = false;
        self.document_generation += 1;
    }

    fn replace_root(&mut self, root: Option<String>) {
        self.project_root = root;
        self.active_notebook = None;
        self.clear_document();
    }
}

/// Marks a gateway call in flight for as long as it is alive
struct InFlight<'a> {
    state: &'a RwLock<StoreState>,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a RwLock<StoreState>) -> Self {
        state.write().in_flight += 1;
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut s = self.state.write();
        s.in_flight = s.in_flight.saturating_sub(1);
    }
}

// ============================================
// SNAPSHOT
// ============================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookView {
    pub name: String,
    pub path: String,
    pub pages: Vec<FileSystemEntry>,
}

/// Everything the view layer renders from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub project_root: Option<String>,
    pub entries: Vec<FileSystemEntry>,
    pub document: Option<DocumentRef>,
    pub document_key: Option<String>,
    pub display_title: Option<String>,
    pub content: String,
    pub dirty: bool,
    pub active_notebook: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub notebooks: Vec<NotebookView>,
    pub loose_pages: Vec<FileSystemEntry>,
    pub separator: char,
}

// ============================================
// STORE
// ============================================

pub struct NoteStore<G: FileGateway> {
    gateway: G,
    separator: char,
    settings: RwLock<Settings>,
    state: RwLock<StoreState>,
}

pub type SharedStore<G> = Arc<NoteStore<G>>;

impl<G: FileGateway> NoteStore<G> {
    pub fn new(gateway: G, settings: Settings, separator: char) -> Self {
        Self {
            gateway,
            separator,
            settings: RwLock::new(settings),
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Build a store using the separator reported by the gateway
    pub async fn connect(gateway: G, settings: Settings) -> Self {
        let separator = gateway.path_separator().await;
        tracing::info!("[NoteStore::connect] Path separator: {:?}", separator);
        Self::new(gateway, settings, separator)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn update_settings(&self, settings: Settings) {
        *self.settings.write() = settings;
    }

    /// Copy of the raw state
    pub fn state(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn project_root(&self) -> Option<String> {
        self.state.read().project_root.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    fn fail(&self, message: String) -> Outcome {
        tracing::warn!("[NoteStore] {}", message);
        self.state.write().error = Some(message);
        Outcome::Failed
    }

    fn normalize(&self, path: &str) -> String {
        paths::trim_trailing_separator(path.trim(), self.separator).to_string()
    }

    /// Notebook context of a page: its immediate parent directory
    fn notebook_for(&self, path: &str) -> Option<String> {
        paths::parent_of(path, self.separator).map(str::to_string)
    }

    // ============================================
    // PROJECT & LISTING
    // ============================================

    /// Replace the project root. Clears the open document and active notebook.
    pub fn set_project_root(&self, path: Option<&str>) {
        let root = path.filter(|p| !p.trim().is_empty()).map(|p| self.normalize(p));
        tracing::info!("[set_project_root] {:?}", root);
        self.state.write().replace_root(root);
    }

    pub async fn list_directory(&self, target: ListTarget) -> Outcome {
        let (requested, ticket) = {
            let mut s = self.state.write();
            s.error = None;
            s.listing_generation += 1;
            let requested = match target {
                ListTarget::Pick => None,
                ListTarget::Path(path) => Some(self.normalize(&path)),
                ListTarget::ProjectRoot => s.project_root.clone(),
            };
            (requested, s.listing_generation)
        };
        tracing::debug!("[list_directory] Listing {:?}", requested);

        let _loading = InFlight::begin(&self.state);
        let reply = self.gateway.list_directory(requested.as_deref()).await;

        let mut s = self.state.write();
        if s.listing_generation != ticket {
            tracing::debug!("[list_directory] Dropping stale listing of {:?}", requested);
            return Outcome::Superseded;
        }
        match (requested, reply) {
            (None, GatewayReply::Done(listing)) => {
                let root = self.normalize(&listing.path);
                tracing::info!("[list_directory] Opened project {} ({} entries)", root, listing.items.len());
                s.replace_root(Some(root));
                s.entries = listing.items;
                Outcome::Completed
            }
            (None, GatewayReply::Cancelled) => {
                s.entries.clear();
                s.error = Some("No project folder was selected".to_string());
                Outcome::Cancelled
            }
            (None, GatewayReply::Failed(message)) => {
                s.entries.clear();
                s.error = Some(format!("Could not open the project folder: {}", message));
                Outcome::Failed
            }
            (Some(path), GatewayReply::Done(listing)) => {
                if s.project_root.is_none() {
                    tracing::info!("[list_directory] Adopting {} as project root", path);
                    s.replace_root(Some(path));
                }
                s.entries = listing.items;
                Outcome::Completed
            }
            (Some(_), GatewayReply::Cancelled) => Outcome::Cancelled,
            (Some(path), GatewayReply::Failed(message)) => {
                tracing::warn!("[list_directory] ERROR listing {}: {}", path, message);
                s.entries.clear();
                s.error = Some(StoreError::Io(format!("Could not load files from {}: {}", path, message)).to_string());
                Outcome::Failed
            }
        }
    }

    /// Re-list the project root, if one is set
    async fn refresh_listing(&self) {
        if self.project_root().is_some() {
            self.list_directory(ListTarget::ProjectRoot).await;
        }
    }

    // ============================================
    // DOCUMENT SESSION
    // ============================================

    pub async fn open_file(&self, path: &str) -> StoreResult<Outcome> {
        if path.trim().is_empty() {
            tracing::warn!("[open_file] Called without a path, ignoring");
            return Err(StoreError::MissingPath("open_file"));
        }
        let (ticket, generation) = {
            let mut s = self.state.write();
            s.error = None;
            s.open_generation += 1;
            (s.open_generation, s.document_generation)
        };
        tracing::info!("[open_file] Opening {}", path);

        let _loading = InFlight::begin(&self.state);
        let reply = self.gateway.read_file(path).await;

        let mut s = self.state.write();
        if s.open_generation != ticket || s.document_generation != generation {
            tracing::debug!("[open_file] Dropping stale read of {}", path);
            return Ok(Outcome::Superseded);
        }
        let outcome = match reply {
            GatewayReply::Done(file) => {
                s.active_notebook = self.notebook_for(&file.path);
                s.document = Some(DocumentRef::saved(file.path));
                s.original_content = file.content.clone();
                s.content = file.content;
                s.dirty = false;
                s.document_generation += 1;
                Outcome::Completed
            }
            GatewayReply::Cancelled => Outcome::Cancelled,
            GatewayReply::Failed(message) => {
                tracing::warn!("[open_file] ERROR: {}", message);
                s.error = Some(format!("Could not open {}: {}", path, message));
                Outcome::Failed
            }
        };
        Ok(outcome)
    }

    /// Show the open-file dialog and open the chosen file
    pub async fn pick_and_open_file(&self) -> Outcome {
        let picked = {
            let _loading = InFlight::begin(&self.state);
            self.gateway.pick_file().await
        };
        match picked {
            GatewayReply::Done(path) => match self.open_file(&path).await {
                Ok(outcome) => outcome,
                Err(e) => self.fail(e.to_string()),
            },
            GatewayReply::Cancelled => Outcome::Cancelled,
            GatewayReply::Failed(message) => self.fail(format!("Could not open a file: {}", message)),
        }
    }

    pub fn update_content(&self, text: &str) {
        let mut s = self.state.write();
        s.content = text.to_string();
        s.dirty = s.content != s.original_content;
    }

    pub async fn save_current_file(&self) -> Outcome {
        let current = {
            let s = self.state.read();
            match &s.document {
                Some(DocumentRef::Saved { path }) => Some((path.clone(), s.content.clone(), s.document_generation)),
                _ => None,
            }
        };
        let Some((path, content, generation)) = current else {
            return self.save_file_as().await;
        };
        tracing::info!("[save_current_file] Saving {} ({} bytes)", path, content.len());

        let outcome = {
            let _loading = InFlight::begin(&self.state);
            let reply = self.gateway.write_file(WriteTarget::Path(path.clone()), &content).await;

            let mut s = self.state.write();
            match reply {
                GatewayReply::Failed(message) => {
                    tracing::warn!("[save_current_file] ERROR: {}", message);
                    s.error = Some(format!("Could not save {}: {}", path, message));
                    Outcome::Failed
                }
                _ if s.document_generation != generation => {
                    tracing::debug!("[save_current_file] Document changed while saving {}", path);
                    Outcome::Superseded
                }
                GatewayReply::Done(written) => {
                    s.document = Some(DocumentRef::saved(written));
                    s.original_content = content;
                    s.dirty = s.content != s.original_content;
                    s.error = None;
                    Outcome::Completed
                }
                GatewayReply::Cancelled => Outcome::Cancelled,
            }
        };

        if matches!(outcome, Outcome::Completed | Outcome::Superseded) {
            self.refresh_listing().await;
        }
        outcome
    }

    pub async fn save_file_as(&self) -> Outcome {
        let (suggested, content, generation) = {
            let s = self.state.read();
            (self.suggested_path(&s), s.content.clone(), s.document_generation)
        };
        tracing::info!("[save_file_as] Suggesting {:?}", suggested);

        let outcome = {
            let _loading = InFlight::begin(&self.state);
            let reply = self.gateway.write_file(WriteTarget::Dialog { suggested }, &content).await;

            let mut s = self.state.write();
            match reply {
                GatewayReply::Cancelled => {
                    tracing::debug!("[save_file_as] Cancelled by user");
                    Outcome::Cancelled
                }
                GatewayReply::Failed(message) => {
                    tracing::warn!("[save_file_as] ERROR: {}", message);
                    s.error = Some(format!("Could not save as: {}", message));
                    Outcome::Failed
                }
                _ if s.document_generation != generation => Outcome::Superseded,
                GatewayReply::Done(written) => {
                    tracing::info!("[save_file_as] Saved as {}", written);
                    s.active_notebook = self.notebook_for(&written);
                    s.document = Some(DocumentRef::saved(written));
                    s.original_content = content;
                    s.dirty = s.content != s.original_content;
                    s.error = None;
                    Outcome::Completed
                }
            }
        };

        if matches!(outcome, Outcome::Completed | Outcome::Superseded) {
            self.refresh_listing().await;
        }
        outcome
    }

    /// Default destination offered by the save dialog
    fn suggested_path(&self, s: &StoreState) -> Option<String> {
        let (dir, title) = match &s.document {
            Some(DocumentRef::Saved { path }) => return Some(path.clone()),
            Some(DocumentRef::Unsaved { notebook, .. }) => (notebook.clone().or_else(|| s.project_root.clone()), self.title_of(&s.content)),
            None => (s.project_root.clone(), self.title_of(&s.content)),
        };
        let settings = self.settings.read();
        let mut stem = slug::slugify(&title);
        if stem.is_empty() {
            stem = "untitled".to_string();
        }
        let filename = format!("{}.{}", stem, settings.default_extension);
        Some(match dir {
            Some(dir) => paths::join(&dir, &filename, self.separator),
            None => filename,
        })
    }

    /// First level-one heading of `content`, else the configured page title
    fn title_of(&self, content: &str) -> String {
        content
            .lines()
            .find_map(|line| line.trim().strip_prefix("# "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.settings.read().new_page_title.clone())
    }

    /// Start a new page in memory. Nothing is written until it is saved.
    pub fn create_new_file(&self, parent: Option<&str>) -> NewPage {
        let settings = self.settings.read().clone();
        let parent = parent.filter(|p| !p.trim().is_empty()).map(|p| self.normalize(p));
        let document = DocumentRef::unsaved(parent.clone());
        let page = NewPage { key: document.key(), display_name: settings.new_page_title.clone() };
        tracing::info!("[create_new_file] New page {} in {:?}", page.key, parent);

        let mut s = self.state.write();
        s.document = Some(document);
        s.content = settings.new_page_content();
        s.original_content = String::new();
        s.dirty = true;
        s.active_notebook = parent;
        s.error = None;
        s.document_generation += 1;
        page
    }

    pub async fn create_new_notebook(&self, root: Option<&str>) -> StoreResult<Outcome> {
        let root = match root.filter(|r| !r.trim().is_empty()) {
            Some(r) => self.normalize(r),
            None => {
                tracing::warn!("[create_new_notebook] No project root given");
                return Err(StoreError::NoProjectRoot("create_new_notebook"));
            }
        };

        let answer = self.gateway.prompt_text(NOTEBOOK_PROMPT, NOTEBOOK_DEFAULT_NAME).await;
        let name = match answer {
            GatewayReply::Done(name) if !name.is_empty() => name,
            GatewayReply::Done(_) | GatewayReply::Cancelled => {
                tracing::debug!("[create_new_notebook] No name entered");
                return Ok(Outcome::Cancelled);
            }
            GatewayReply::Failed(message) => return Ok(self.fail(format!("Could not ask for a notebook name: {}", message))),
        };

        let clean = paths::sanitize_name(&name);
        if clean.is_empty() {
            return Ok(self.fail(StoreError::InvalidName(name).to_string()));
        }
        let target = paths::join(&root, &clean, self.separator);
        tracing::info!("[create_new_notebook] Creating {}", target);

        let reply = {
            let _loading = InFlight::begin(&self.state);
            self.gateway.create_directory(&target).await
        };
        match reply {
            GatewayReply::Done(created) => {
                let created = self.normalize(&created);
                // Listing `root` adopts it when no project root is set yet
                match self.project_root() {
                    Some(current) if current != root => self.refresh_listing().await,
                    _ => {
                        self.list_directory(ListTarget::Path(root)).await;
                    }
                }
                self.state.write().active_notebook = Some(created);
                Ok(Outcome::Completed)
            }
            GatewayReply::Cancelled => Ok(Outcome::Cancelled),
            GatewayReply::Failed(message) => Ok(self.fail(format!("Could not create notebook {}: {}", clean, message))),
        }
    }

    pub async fn delete_file(&self, path: &str) -> StoreResult<Outcome> {
        if path.trim().is_empty() {
            tracing::warn!("[delete_file] Called without a path, ignoring");
            return Err(StoreError::MissingPath("delete_file"));
        }
        tracing::info!("[delete_file] Deleting {}", path);

        let reply = {
            let _loading = InFlight::begin(&self.state);
            self.gateway.delete_file(path).await
        };
        match reply {
            GatewayReply::Done(()) => {
                {
                    let mut s = self.state.write();
                    let is_current = s.document.as_ref().and_then(DocumentRef::saved_path) == Some(path);
                    if is_current {
                        tracing::debug!("[delete_file] Deleted the open document, clearing session");
                        s.clear_document();
                    }
                    if s.active_notebook.as_deref() == Some(path) {
                        s.active_notebook = None;
                    }
                }
                self.refresh_listing().await;
                Ok(Outcome::Completed)
            }
            GatewayReply::Cancelled => Ok(Outcome::Cancelled),
            GatewayReply::Failed(message) => Ok(self.fail(format!("Could not delete {}: {}", path, message))),
        }
    }

    // ============================================
    // SIDEBAR HELPERS
    // ============================================

    /// "New Note" without an open project: create and open the default
    /// project folder first, then start a page in the active notebook.
    pub async fn setup_default_project(&self) -> StoreResult<Outcome> {
        if self.project_root().is_none() {
            let dir = self
                .settings
                .read()
                .default_project
                .clone()
                .or_else(crate::storage::defaultProjectDir)
                .ok_or(StoreError::NoProjectRoot("setup_default_project"))?;
            tracing::info!("[setup_default_project] Using {}", dir);

            let reply = {
                let _loading = InFlight::begin(&self.state);
                self.gateway.create_directory(&dir).await
            };
            let created = match reply {
                GatewayReply::Done(created) => created,
                GatewayReply::Cancelled => return Ok(Outcome::Cancelled),
                GatewayReply::Failed(message) => {
                    return Ok(self.fail(format!("Could not create the default project {}: {}", dir, message)));
                }
            };
            self.set_project_root(Some(&created));
            match self.list_directory(ListTarget::ProjectRoot).await {
                Outcome::Completed => {}
                other => return Ok(other),
            }
        }

        let notebook = self.state.read().active_notebook.clone();
        self.create_new_file(notebook.as_deref());
        Ok(Outcome::Completed)
    }

    /// Store an image under the project's assets directory. Returns the
    /// root-relative URL to embed, or None when the write failed.
    pub async fn save_image(&self, name: &str, bytes: &[u8]) -> StoreResult<Option<String>> {
        let root = self.project_root().ok_or(StoreError::NoProjectRoot("save_image"))?;
        let mut clean = paths::sanitize_name(name);
        if clean.is_empty() {
            clean = "image".to_string();
        }
        let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), clean);
        let assets = paths::join(&root, ASSETS_DIR, self.separator);
        let target = paths::join(&assets, &filename, self.separator);
        tracing::info!("[save_image] Writing {} bytes to {}", bytes.len(), target);

        let reply = {
            let _loading = InFlight::begin(&self.state);
            self.gateway.write_bytes(&target, bytes).await
        };
        match reply {
            GatewayReply::Done(_) => Ok(Some(format!("{}/{}", ASSETS_DIR, filename))),
            GatewayReply::Cancelled => Ok(None),
            GatewayReply::Failed(message) => {
                self.fail(format!("Could not save image {}: {}", clean, message));
                Ok(None)
            }
        }
    }

    // ============================================
    // DERIVED VIEWS
    // ============================================

    /// Directories directly below the project root
    pub fn notebooks(&self) -> Vec<FileSystemEntry> {
        let s = self.state.read();
        let Some(root) = s.project_root.as_deref() else {
            return Vec::new();
        };
        s.entries
            .iter()
            .filter(|e| e.is_directory() && paths::is_direct_child(root, &e.path, self.separator))
            .cloned()
            .collect()
    }

    /// Files directly inside `notebook`
    pub fn pages_for_notebook(&self, notebook: Option<&str>) -> Vec<FileSystemEntry> {
        let Some(notebook) = notebook else {
            return Vec::new();
        };
        let s = self.state.read();
        s.entries
            .iter()
            .filter(|e| e.is_file() && paths::is_direct_child(notebook, &e.path, self.separator))
            .cloned()
            .collect()
    }

    /// Files directly below the project root (not inside any notebook)
    pub fn loose_pages(&self) -> Vec<FileSystemEntry> {
        let root = self.project_root();
        self.pages_for_notebook(root.as_deref())
    }

    /// Header title: file stem of a saved page, "<title> (unsaved)" otherwise
    pub fn display_title(&self) -> Option<String> {
        let s = self.state.read();
        match s.document.as_ref()? {
            DocumentRef::Saved { path } => Some(paths::file_stem(path, self.separator).to_string()),
            DocumentRef::Unsaved { .. } => Some(format!("{} (unsaved)", self.title_of(&s.content))),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let notebooks = self
            .notebooks()
            .into_iter()
            .map(|nb| NotebookView {
                pages: self.pages_for_notebook(Some(&nb.path)),
                name: nb.name,
                path: nb.path,
            })
            .collect();
        let loose_pages = self.loose_pages();
        let display_title = self.display_title();

        let s = self.state.read();
        StoreSnapshot {
            project_root: s.project_root.clone(),
            entries: s.entries.clone(),
            document_key: s.document.as_ref().map(DocumentRef::key),
            document: s.document.clone(),
            display_title,
            content: s.content.clone(),
            dirty: s.dirty,
            active_notebook: s.active_notebook.clone(),
            loading: s.loading(),
            error: s.error.clone(),
            notebooks,
            loose_pages,
            separator: self.separator,
        }
    }
}
