// Local file-system gateway
// Real file access through tokio::fs; dialogs and text prompts are delegated
// to a Prompter so the same gateway runs headless (tests) or on the desktop.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use parking_lot::Mutex;
use tokio::fs;

use crate::gateway::{FileContents, FileGateway, GatewayReply, Listing, WriteTarget};
use crate::models::FileSystemEntry;

// ============================================
// PROMPTER
// ============================================

/// User-facing dialogs. `None` means the user dismissed the dialog.
pub trait Prompter: Send + Sync {
    fn pick_file(&self) -> impl Future<Output = Option<String>> + Send;
    fn pick_folder(&self) -> impl Future<Output = Option<String>> + Send;
    fn save_file(&self, suggested: Option<String>) -> impl Future<Output = Option<String>> + Send;
    fn prompt_text(&self, message: &str, default_value: &str) -> impl Future<Output = Option<String>> + Send;
}

/// Prompter answering from a queue, in call order. An exhausted queue
/// behaves like the user cancelling every dialog.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next answer (None = cancel)
    pub fn push(&self, answer: Option<&str>) {
        self.answers.lock().push_back(answer.map(str::to_string));
    }

    /// Descriptions of every dialog shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }

    fn next(&self, what: String) -> Option<String> {
        tracing::debug!("[ScriptedPrompter] {}", what);
        self.asked.lock().push(what);
        self.answers.lock().pop_front().flatten()
    }
}

impl Prompter for ScriptedPrompter {
    async fn pick_file(&self) -> Option<String> {
        self.next("pick_file".to_string())
    }

    async fn pick_folder(&self) -> Option<String> {
        self.next("pick_folder".to_string())
    }

    async fn save_file(&self, suggested: Option<String>) -> Option<String> {
        self.next(format!("save_file {}", suggested.unwrap_or_default()))
    }

    async fn prompt_text(&self, message: &str, default_value: &str) -> Option<String> {
        self.next(format!("prompt_text {} [{}]", message, default_value))
    }
}

// ============================================
// GATEWAY
// ============================================

pub struct LocalGateway<P: Prompter> {
    prompter: P,
    list_depth: usize,
}

impl<P: Prompter> LocalGateway<P> {
    pub fn new(prompter: P) -> Self {
        Self { prompter, list_depth: 2 }
    }

    /// Number of directory levels a listing flattens (minimum 1)
    pub fn with_list_depth(mut self, depth: usize) -> Self {
        self.list_depth = depth.max(1);
        self
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    async fn write_to(&self, path: &str, bytes: &[u8]) -> GatewayReply<String> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent).await {
                    return GatewayReply::Failed(e.to_string());
                }
            }
        }
        match fs::write(path, bytes).await {
            Ok(()) => {
                tracing::debug!("[LocalGateway::write] Wrote {} bytes to {}", bytes.len(), path);
                GatewayReply::Done(path.to_string())
            }
            Err(e) => {
                tracing::warn!("[LocalGateway::write] ERROR writing {}: {}", path, e);
                GatewayReply::Failed(e.to_string())
            }
        }
    }

    async fn list(&self, root: &str) -> GatewayReply<Listing> {
        match fs::metadata(root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return GatewayReply::Failed(format!("{} is not a directory", root)),
            Err(e) => return GatewayReply::Failed(e.to_string()),
        }

        let mut items = Vec::new();
        let mut pending: VecDeque<(PathBuf, usize)> = VecDeque::from([(PathBuf::from(root), 1)]);

        while let Some((dir, level)) = pending.pop_front() {
            let mut reader = match fs::read_dir(&dir).await {
                Ok(r) => r,
                Err(e) if level == 1 => return GatewayReply::Failed(e.to_string()),
                Err(e) => {
                    tracing::warn!("[LocalGateway::list] Skipping unreadable {}: {}", dir.display(), e);
                    continue;
                }
            };
            loop {
                let entry = match reader.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("[LocalGateway::list] Read error in {}: {}", dir.display(), e);
                        break;
                    }
                };
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') {
                    continue;
                }
                let is_dir = match entry.file_type().await {
                    Ok(t) => t.is_dir(),
                    Err(_) => continue,
                };
                let path = entry.path();
                let path_str = path.to_string_lossy().to_string();
                if is_dir {
                    items.push(FileSystemEntry::directory(name, path_str));
                    if level < self.list_depth {
                        pending.push_back((path, level + 1));
                    }
                } else {
                    items.push(FileSystemEntry::file(name, path_str));
                }
            }
        }

        items.sort_by(|a, b| {
            b.is_directory()
                .cmp(&a.is_directory())
                .then_with(|| a.path.to_lowercase().cmp(&b.path.to_lowercase()))
        });
        tracing::debug!("[LocalGateway::list] {} entries under {}", items.len(), root);
        GatewayReply::Done(Listing { path: root.to_string(), items })
    }
}

impl<P: Prompter> FileGateway for LocalGateway<P> {
    async fn pick_file(&self) -> GatewayReply<String> {
        match self.prompter.pick_file().await {
            Some(path) => GatewayReply::Done(path),
            None => GatewayReply::Cancelled,
        }
    }

    async fn read_file(&self, path: &str) -> GatewayReply<FileContents> {
        match fs::read_to_string(path).await {
            Ok(content) => GatewayReply::Done(FileContents { path: path.to_string(), content }),
            Err(e) => GatewayReply::Failed(e.to_string()),
        }
    }

    async fn write_file(&self, target: WriteTarget, content: &str) -> GatewayReply<String> {
        let path = match target {
            WriteTarget::Path(path) => path,
            WriteTarget::Dialog { suggested } => match self.prompter.save_file(suggested).await {
                Some(path) => path,
                None => return GatewayReply::Cancelled,
            },
        };
        self.write_to(&path, content.as_bytes()).await
    }

    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> GatewayReply<String> {
        self.write_to(path, bytes).await
    }

    async fn list_directory(&self, path: Option<&str>) -> GatewayReply<Listing> {
        match path {
            Some(path) => self.list(path).await,
            None => match self.prompter.pick_folder().await {
                Some(picked) => self.list(&picked).await,
                None => GatewayReply::Cancelled,
            },
        }
    }

    async fn create_directory(&self, path: &str) -> GatewayReply<String> {
        fs::create_dir_all(path).await.map(|_| path.to_string()).into()
    }

    async fn delete_file(&self, path: &str) -> GatewayReply<()> {
        let meta = match fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) => return GatewayReply::Failed(e.to_string()),
        };
        if meta.is_dir() {
            fs::remove_dir(path).await.into()
        } else {
            fs::remove_file(path).await.into()
        }
    }

    async fn prompt_text(&self, message: &str, default_value: &str) -> GatewayReply<String> {
        match self.prompter.prompt_text(message, default_value).await {
            Some(text) => GatewayReply::Done(text),
            None => GatewayReply::Cancelled,
        }
    }

    async fn path_separator(&self) -> char {
        MAIN_SEPARATOR
    }
}
