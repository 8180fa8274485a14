// In-memory gateway for store tests: a fake '/'-separated file system with
// scripted dialog answers, injectable failures and pause points.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use quillnote_lib::paths;
use quillnote_lib::{
    FileContents, FileGateway, FileSystemEntry, GatewayReply, Listing, NoteStore, Prompter, ScriptedPrompter,
    Settings, WriteTarget,
};
use tokio::sync::Notify;

/// A pause point: the gateway signals `entered`, then waits for `release`
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub struct MemoryGateway {
    pub files: Mutex<BTreeMap<String, String>>,
    pub dirs: Mutex<BTreeSet<String>>,
    pub prompter: ScriptedPrompter,
    failures: Mutex<HashMap<&'static str, String>>,
    gates: Mutex<HashMap<&'static str, Gate>>,
    pub calls: Mutex<Vec<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.dirs.lock().insert(path.to_string());
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().insert(path.to_string(), content.to_string());
        self
    }

    /// Make the next call of `op` fail with `message`
    pub fn fail_next(&self, op: &'static str, message: &str) {
        self.failures.lock().insert(op, message.to_string());
    }

    /// Pause the next call of `op` until the returned gate is released
    pub fn pause_next(&self, op: &'static str) -> Gate {
        let gate = Gate::default();
        self.gates.lock().insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    async fn enter(&self, op: &'static str, arg: &str) -> Option<String> {
        self.calls.lock().push(format!("{} {}", op, arg));
        let gate = self.gates.lock().remove(op);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.failures.lock().remove(op)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.dirs.lock().contains(path)
    }

    fn list(&self, root: &str) -> GatewayReply<Listing> {
        if !self.is_dir(root) {
            return GatewayReply::Failed(format!("ENOENT: no such directory, scandir '{}'", root));
        }
        let mut items = Vec::new();
        for dir in self.dirs.lock().iter() {
            if paths::depth_below(root, dir, '/').is_some() {
                items.push(FileSystemEntry::directory(paths::file_name(dir, '/'), dir.clone()));
            }
        }
        for path in self.files.lock().keys() {
            if paths::depth_below(root, path, '/').is_some() {
                items.push(FileSystemEntry::file(paths::file_name(path, '/'), path.clone()));
            }
        }
        GatewayReply::Done(Listing { path: root.to_string(), items })
    }
}

impl FileGateway for MemoryGateway {
    async fn pick_file(&self) -> GatewayReply<String> {
        if let Some(message) = self.enter("pick_file", "").await {
            return GatewayReply::Failed(message);
        }
        match self.prompter.pick_file().await {
            Some(path) => GatewayReply::Done(path),
            None => GatewayReply::Cancelled,
        }
    }

    async fn read_file(&self, path: &str) -> GatewayReply<FileContents> {
        if let Some(message) = self.enter("read_file", path).await {
            return GatewayReply::Failed(message);
        }
        match self.file(path) {
            Some(content) => GatewayReply::Done(FileContents { path: path.to_string(), content }),
            None => GatewayReply::Failed(format!("ENOENT: no such file, open '{}'", path)),
        }
    }

    async fn write_file(&self, target: WriteTarget, content: &str) -> GatewayReply<String> {
        let arg = match &target {
            WriteTarget::Path(p) => p.clone(),
            WriteTarget::Dialog { suggested } => format!("<dialog {}>", suggested.clone().unwrap_or_default()),
        };
        if let Some(message) = self.enter("write_file", &arg).await {
            return GatewayReply::Failed(message);
        }
        let path = match target {
            WriteTarget::Path(p) => p,
            WriteTarget::Dialog { suggested } => match self.prompter.save_file(suggested).await {
                Some(p) => p,
                None => return GatewayReply::Cancelled,
            },
        };
        self.files.lock().insert(path.clone(), content.to_string());
        GatewayReply::Done(path)
    }

    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> GatewayReply<String> {
        if let Some(message) = self.enter("write_bytes", path).await {
            return GatewayReply::Failed(message);
        }
        self.files.lock().insert(path.to_string(), format!("<{} bytes>", bytes.len()));
        GatewayReply::Done(path.to_string())
    }

    async fn list_directory(&self, path: Option<&str>) -> GatewayReply<Listing> {
        if let Some(message) = self.enter("list_directory", path.unwrap_or("<picker>")).await {
            return GatewayReply::Failed(message);
        }
        match path {
            Some(path) => self.list(path),
            None => match self.prompter.pick_folder().await {
                Some(picked) => self.list(&picked),
                None => GatewayReply::Cancelled,
            },
        }
    }

    async fn create_directory(&self, path: &str) -> GatewayReply<String> {
        if let Some(message) = self.enter("create_directory", path).await {
            return GatewayReply::Failed(message);
        }
        self.dirs.lock().insert(path.to_string());
        GatewayReply::Done(path.to_string())
    }

    async fn delete_file(&self, path: &str) -> GatewayReply<()> {
        if let Some(message) = self.enter("delete_file", path).await {
            return GatewayReply::Failed(message);
        }
        if self.files.lock().remove(path).is_some() || self.dirs.lock().remove(path) {
            GatewayReply::Done(())
        } else {
            GatewayReply::Failed(format!("ENOENT: no such file, unlink '{}'", path))
        }
    }

    async fn prompt_text(&self, message: &str, default_value: &str) -> GatewayReply<String> {
        if let Some(message) = self.enter("prompt_text", message).await {
            return GatewayReply::Failed(message);
        }
        match self.prompter.prompt_text(message, default_value).await {
            Some(text) => GatewayReply::Done(text),
            None => GatewayReply::Cancelled,
        }
    }

    async fn path_separator(&self) -> char {
        '/'
    }
}

/// Project `/p` with notebook `nbA` holding `x.md` and a loose page
pub fn sample_gateway() -> MemoryGateway {
    MemoryGateway::new()
        .with_dir("/p")
        .with_dir("/p/nbA")
        .with_file("/p/nbA/x.md", "# X\n\nbody of x")
        .with_file("/p/loose.md", "loose body")
}

pub fn store_with(gateway: MemoryGateway) -> Arc<NoteStore<MemoryGateway>> {
    Arc::new(NoteStore::new(gateway, Settings::default(), '/'))
}
