//! High-level facade tying the tree reader, lifecycle manager and metadata
//! index together.
//!
//! One user action maps to one method here. Every mutating method leaves the
//! index consistent with disk without a full rescan, and [`Vault::snapshot`]
//! exposes the resulting state as an immutable value for the UI layer
//! instead of shared mutable fields.

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::error::VaultError;
use crate::frontmatter;
use crate::gateway::FilesystemGateway;
use crate::index::VaultIndex;
use crate::lifecycle::{NoteLifecycle, DEFAULT_CONTENT};
use crate::model::{ActiveFilter, FolderNode, NoteIdentity, NoteStatus, StatusCounts};
use crate::tree;


pub struct Vault {
    gateway: Arc<dyn FilesystemGateway>,
    lifecycle: NoteLifecycle,
    index: VaultIndex,
    root: Option<String>,
    structure: Vec<FolderNode>,
    selected_folder: Option<String>,
    active_filter: Option<ActiveFilter>,
}

/// Immutable view of the vault state after an action.
#[derive(Debug, Clone, Serialize)]
pub struct VaultSnapshot {
    pub files: Vec<NoteIdentity>,
    pub status_counts: StatusCounts,
    pub tags: Vec<String>,
    pub active_filter: Option<ActiveFilter>,
}

impl Vault {
    pub fn new(gateway: Arc<dyn FilesystemGateway>) -> Self {
        let lifecycle = NoteLifecycle::new(gateway.clone());
        Self {
            gateway,
            lifecycle,
            index: VaultIndex::new(),
            root: None,
            structure: Vec::new(),
            selected_folder: None,
            active_filter: None,
        }
    }

    // ------------------------------------------------------------------------
    // Opening a vault
    // ------------------------------------------------------------------------

    /// Prompt for a vault directory and open it. `Ok(None)` means the user
    /// cancelled the picker; nothing changes in that case.
    pub fn open_vault(&mut self) -> Result<Option<&[FolderNode]>, VaultError> {
        let Some(root) = self.gateway.pick_directory()? else {
            return Ok(None);
        };
        self.open_vault_at(&root)?;
        Ok(Some(&self.structure))
    }

    /// Open the vault at a known path. The previous vault's cache, filter
    /// and folder selection are cleared before the new scan begins.
    pub fn open_vault_at(&mut self, root_path: &str) -> Result<(), VaultError> {
        self.index.clear();
        self.active_filter = None;
        self.selected_folder = None;
        self.structure = Vec::new();
        self.root = None;

        let structure = tree::read_vault_structure(&*self.gateway, root_path)?;
        self.index.build(&*self.gateway, root_path)?;
        debug!("opened vault at {root_path}");
        self.root = Some(root_path.to_string());
        self.structure = structure;
        Ok(())
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn structure(&self) -> &[FolderNode] {
        &self.structure
    }

    pub fn index(&self) -> &VaultIndex {
        &self.index
    }

    pub fn active_filter(&self) -> Option<&ActiveFilter> {
        self.active_filter.as_ref()
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.selected_folder.as_deref()
    }

    // ------------------------------------------------------------------------
    // Views: folder selection and filters (mutually exclusive)
    // ------------------------------------------------------------------------

    /// Show the notes of one folder, immediate children only. Selecting a
    /// folder clears the active filter.
    pub fn select_folder(&mut self, folder_path: &str) -> Result<Vec<NoteIdentity>, VaultError> {
        self.active_filter = None;
        self.selected_folder = Some(folder_path.to_string());
        tree::read_markdown_files(&*self.gateway, folder_path)
    }

    /// Vault-wide note list, refreshing the index with a full scan.
    pub fn show_all_notes(&mut self) -> Result<Vec<NoteIdentity>, VaultError> {
        let root = self.require_root()?.to_string();
        self.active_filter = None;
        self.selected_folder = None;
        self.index.build(&*self.gateway, &root)?;
        Ok(self.index.files().to_vec())
    }

    /// Filter the vault-wide list by status. Clears the folder selection.
    pub fn filter_by_status(&mut self, status: NoteStatus) -> Result<Vec<NoteIdentity>, VaultError> {
        self.ensure_index()?;
        self.selected_folder = None;
        self.active_filter = Some(ActiveFilter::Status(status));
        Ok(self.index.filter_by_status(status))
    }

    /// Filter the vault-wide list by tag. Clears the folder selection.
    pub fn filter_by_tag(&mut self, tag: &str) -> Result<Vec<NoteIdentity>, VaultError> {
        self.ensure_index()?;
        self.selected_folder = None;
        self.active_filter = Some(ActiveFilter::Tag(tag.to_string()));
        Ok(self.index.filter_by_tag(tag))
    }

    pub fn clear_filter(&mut self) {
        self.active_filter = None;
    }

    // ------------------------------------------------------------------------
    // Note lifecycle (disk mutation + incremental cache patch)
    // ------------------------------------------------------------------------

    /// Load a note body for the editor.
    pub fn read_note(&self, path: &str) -> Result<String, VaultError> {
        self.gateway.read_text_file(path)
    }

    /// Save edited content and patch the cache in place.
    pub fn save_note(&mut self, path: &str, content: &str) -> Result<(), VaultError> {
        self.lifecycle.save_note(path, content)?;
        let (meta, _body) = frontmatter::parse(content);
        self.index.apply_save(path, meta);
        Ok(())
    }

    /// Rename a note, or save it in place when the gateway cannot rename.
    /// Returns the note's path afterwards; an unchanged path despite a new
    /// base name means the rename was unsupported.
    pub fn rename_note(
        &mut self,
        old_path: &str,
        new_base_name: &str,
        content: &str,
    ) -> Result<String, VaultError> {
        let new_path = self
            .lifecycle
            .rename_or_save_as_new(old_path, new_base_name, content)?;
        if new_path == old_path {
            // Content landed at the old path either way; treat as a save.
            let (meta, _body) = frontmatter::parse(content);
            self.index.apply_save(old_path, meta);
        } else {
            self.index.apply_rename(old_path, &new_path);
        }
        Ok(new_path)
    }

    /// Create a new note in `dir_path` and register it in the cache.
    pub fn create_note(
        &mut self,
        dir_path: &str,
        base_name: Option<&str>,
        initial_content: Option<&str>,
    ) -> Result<NoteIdentity, VaultError> {
        let identity = self
            .lifecycle
            .create_note(dir_path, base_name, initial_content)?;
        let (meta, _body) = frontmatter::parse(initial_content.unwrap_or(DEFAULT_CONTENT));
        self.index.apply_create(identity.clone(), meta);
        Ok(identity)
    }

    // ------------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> VaultSnapshot {
        VaultSnapshot {
            files: self.index.files().to_vec(),
            status_counts: self.index.status_counts(),
            tags: self.index.tag_universe().iter().cloned().collect(),
            active_filter: self.active_filter.clone(),
        }
    }

    fn require_root(&self) -> Result<&str, VaultError> {
        self.root.as_deref().ok_or(VaultError::NoVaultOpen)
    }

    fn ensure_index(&mut self) -> Result<(), VaultError> {
        if self.index.is_empty() {
            let root = self.require_root()?.to_string();
            self.index.build(&*self.gateway, &root)?;
        }
        Ok(())
    }
}
