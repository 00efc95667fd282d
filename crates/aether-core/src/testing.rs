//! In-memory gateway double for unit tests.

use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

use crate::error::VaultError;
use crate::gateway::{FilesystemGateway, GatewayCapabilities};
use crate::model::FolderNode;

/// Gateway backed by a flat `path -> content` map with configurable optional
/// capabilities. Paths use `/` separators; the folder tree handed back by
/// `list_directory` is derived from the stored paths on demand.
pub(crate) struct MemoryGateway {
    files: Mutex<BTreeMap<String, String>>,
    capabilities: GatewayCapabilities,
    picked: Option<String>,
    fail_delete: bool,
}

impl MemoryGateway {
    pub(crate) fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            capabilities: GatewayCapabilities {
                rename: true,
                delete: true,
            },
            picked: None,
            fail_delete: false,
        }
    }

    pub(crate) fn without_rename(mut self) -> Self {
        self.capabilities.rename = false;
        self
    }

    pub(crate) fn without_delete(mut self) -> Self {
        self.capabilities.delete = false;
        self
    }

    pub(crate) fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub(crate) fn with_picked(mut self, path: &str) -> Self {
        self.picked = Some(path.to_string());
        self
    }

    pub(crate) fn insert(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    pub(crate) fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn build_node(&self, path: &str) -> FolderNode {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        let mut node = FolderNode {
            name,
            path: path.to_string(),
            subfolders: Vec::new(),
            files: Vec::new(),
        };

        let prefix = format!("{path}/");
        let mut dirs: Vec<String> = Vec::new();
        {
            let files = self.files.lock().unwrap();
            for key in files.keys() {
                let Some(rest) = key.strip_prefix(&prefix) else {
                    continue;
                };
                match rest.split_once('/') {
                    None => node.files.push(rest.to_string()),
                    Some((dir, _)) => {
                        if !dirs.iter().any(|d| d == dir) {
                            dirs.push(dir.to_string());
                        }
                    }
                }
            }
        }
        for dir in dirs {
            node.subfolders.push(self.build_node(&format!("{prefix}{dir}")));
        }
        node
    }
}

impl FilesystemGateway for MemoryGateway {
    fn capabilities(&self) -> GatewayCapabilities {
        self.capabilities
    }

    fn pick_directory(&self) -> Result<Option<String>, VaultError> {
        Ok(self.picked.clone())
    }

    fn list_directory(&self, path: &str) -> Result<Vec<FolderNode>, VaultError> {
        Ok(vec![self.build_node(path)])
    }

    fn read_text_file(&self, path: &str) -> Result<String, VaultError> {
        self.content(path).ok_or_else(|| VaultError::ReadFile {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        })
    }

    fn write_text_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        self.insert(path, content);
        Ok(())
    }

    fn rename_or_move(&self, from: &str, to: &str) -> Result<(), VaultError> {
        let mut files = self.files.lock().unwrap();
        let content = files.remove(from).ok_or_else(|| VaultError::Move {
            from: from.to_string(),
            to: to.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        })?;
        files.insert(to.to_string(), content);
        Ok(())
    }

    fn delete_file(&self, path: &str) -> Result<(), VaultError> {
        if self.fail_delete {
            return Err(VaultError::Delete {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "delete refused"),
            });
        }
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn create_unique_note(
        &self,
        dir: &str,
        base_name: &str,
        initial_content: &str,
    ) -> Result<String, VaultError> {
        let mut files = self.files.lock().unwrap();
        for n in 0..10_000u32 {
            let candidate = if n == 0 {
                format!("{dir}/{base_name}.md")
            } else {
                format!("{dir}/{base_name} {n}.md")
            };
            if !files.contains_key(&candidate) {
                files.insert(candidate.clone(), initial_content.to_string());
                return Ok(candidate);
            }
        }
        Err(VaultError::CreateNote {
            dir: dir.to_string(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "no free file name"),
        })
    }
}
