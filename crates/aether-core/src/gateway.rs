//! Filesystem gateway boundary.
//!
//! All I/O the core performs goes through [`FilesystemGateway`]; everything
//! between two gateway calls is synchronous in-memory work, so the index
//! needs no locking.

use std::fs;
use std::io::Write;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::VaultError;
use crate::model::{FolderNode, NOTE_EXTENSION};

/// Which optional primitives a gateway provides.
///
/// Captured once when the lifecycle manager is constructed, so the rename
/// fallback chain is a pure function of a known capability set instead of
/// probing at call time.
#[derive(Debug, Clone, Copy)]
pub struct GatewayCapabilities {
    pub rename: bool,
    pub delete: bool,
}

/// Host-provided filesystem surface the core runs against.
pub trait FilesystemGateway: Send + Sync {
    fn capabilities(&self) -> GatewayCapabilities;

    /// Prompt the user for a vault directory. `Ok(None)` means cancelled.
    fn pick_directory(&self) -> Result<Option<String>, VaultError>;

    /// Read the full folder tree rooted at `path`. Each node lists its
    /// immediate child file names; subfolders are nested, not flattened.
    /// Fails as a whole if any intermediate directory is unreadable.
    fn list_directory(&self, path: &str) -> Result<Vec<FolderNode>, VaultError>;

    fn read_text_file(&self, path: &str) -> Result<String, VaultError>;

    fn write_text_file(&self, path: &str, content: &str) -> Result<(), VaultError>;

    /// Atomic rename/move. Only called when `capabilities().rename` is true.
    fn rename_or_move(&self, from: &str, to: &str) -> Result<(), VaultError>;

    /// Only called when `capabilities().delete` is true.
    fn delete_file(&self, path: &str) -> Result<(), VaultError>;

    /// Create a new note file in `dir`, appending a numeric suffix to
    /// `base_name` until a free name is found. Returns the created path.
    fn create_unique_note(
        &self,
        dir: &str,
        base_name: &str,
        initial_content: &str,
    ) -> Result<String, VaultError>;
}

/// Local-disk gateway over `std::fs` and `walkdir`.
pub struct PhysicalGateway;

impl FilesystemGateway for PhysicalGateway {
    fn capabilities(&self) -> GatewayCapabilities {
        GatewayCapabilities {
            rename: true,
            delete: true,
        }
    }

    fn pick_directory(&self) -> Result<Option<String>, VaultError> {
        // Directory picking is a host-UI primitive; the local-disk gateway
        // has no dialog to show.
        Err(VaultError::GatewayUnavailable("pick-directory"))
    }

    fn list_directory(&self, path: &str) -> Result<Vec<FolderNode>, VaultError> {
        build_tree(path)
    }

    fn read_text_file(&self, path: &str) -> Result<String, VaultError> {
        fs::read_to_string(path).map_err(|source| VaultError::ReadFile {
            path: path.to_string(),
            source,
        })
    }

    fn write_text_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        fs::write(path, content).map_err(|source| VaultError::WriteFile {
            path: path.to_string(),
            source,
        })
    }

    fn rename_or_move(&self, from: &str, to: &str) -> Result<(), VaultError> {
        fs::rename(from, to).map_err(|source| VaultError::Move {
            from: from.to_string(),
            to: to.to_string(),
            source,
        })
    }

    fn delete_file(&self, path: &str) -> Result<(), VaultError> {
        fs::remove_file(path).map_err(|source| VaultError::Delete {
            path: path.to_string(),
            source,
        })
    }

    fn create_unique_note(
        &self,
        dir: &str,
        base_name: &str,
        initial_content: &str,
    ) -> Result<String, VaultError> {
        for n in 0..10_000u32 {
            let file_name = if n == 0 {
                format!("{base_name}{NOTE_EXTENSION}")
            } else {
                format!("{base_name} {n}{NOTE_EXTENSION}")
            };
            let candidate = Path::new(dir).join(file_name);

            // create_new refuses existing files, so the collision check and
            // the create are one atomic step.
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(mut file) => {
                    file.write_all(initial_content.as_bytes()).map_err(|source| {
                        VaultError::CreateNote {
                            dir: dir.to_string(),
                            source,
                        }
                    })?;
                    return Ok(candidate.to_string_lossy().into_owned());
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(source) => {
                    return Err(VaultError::CreateNote {
                        dir: dir.to_string(),
                        source,
                    })
                }
            }
        }
        Err(VaultError::CreateNote {
            dir: dir.to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "no free file name after 10000 attempts",
            ),
        })
    }
}

/// Walk the directory into a single-rooted `FolderNode` tree.
///
/// `WalkDir` yields parents before children, so unwinding a stack of open
/// folders to the entry's depth always lands on the containing folder.
fn build_tree(root: &str) -> Result<Vec<FolderNode>, VaultError> {
    let root_path = Path::new(root);
    let root_name = root_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.to_string());

    let mut stack = vec![FolderNode {
        name: root_name,
        path: root.to_string(),
        subfolders: Vec::new(),
        files: Vec::new(),
    }];

    for entry in WalkDir::new(root_path).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|err| VaultError::ListDir {
            path: root.to_string(),
            source: err.into(),
        })?;

        while stack.len() > entry.depth() {
            fold_into_parent(&mut stack);
        }

        let entry_name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            stack.push(FolderNode {
                name: entry_name,
                path: entry.path().to_string_lossy().into_owned(),
                subfolders: Vec::new(),
                files: Vec::new(),
            });
        } else if let Some(folder) = stack.last_mut() {
            folder.files.push(entry_name);
        }
    }

    while stack.len() > 1 {
        fold_into_parent(&mut stack);
    }
    Ok(stack)
}

fn fold_into_parent(stack: &mut Vec<FolderNode>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.subfolders.push(done);
        }
    }
}
