//! In-memory metadata index over the notes of one vault.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::error::VaultError;
use crate::frontmatter;
use crate::gateway::FilesystemGateway;
use crate::lifecycle::display_name;
use crate::model::{NoteIdentity, NoteMeta, NoteStatus, StatusCounts};
use crate::tree;

/// Metadata cache scoped to the currently opened vault.
///
/// `metadata` keys are note paths from the most recent enumeration. A note
/// whose content could not be read stays in `files` but gets no metadata
/// entry, which excludes it from every count and filter while it still
/// displays in note lists.
#[derive(Default)]
pub struct VaultIndex {
    files: Vec<NoteIdentity>,
    metadata: HashMap<String, NoteMeta>,
    tags: BTreeSet<String>,
}

impl VaultIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full scan: enumerate every note in the vault and parse each one
    /// exactly once. A per-file read failure skips that file's metadata,
    /// never the whole scan.
    pub fn build(
        &mut self,
        gateway: &dyn FilesystemGateway,
        vault_root_path: &str,
    ) -> Result<(), VaultError> {
        let files = tree::read_all_markdown_files(gateway, vault_root_path)?;
        let mut metadata = HashMap::with_capacity(files.len());
        for identity in &files {
            match gateway.read_text_file(&identity.path) {
                Ok(content) => {
                    let (meta, _body) = frontmatter::parse(&content);
                    if let Some(tags) = &meta.tags {
                        self.tags.extend(tags.iter().cloned());
                    }
                    metadata.insert(identity.path.clone(), meta);
                }
                Err(err) => warn!("skipping metadata for {}: {err}", identity.path),
            }
        }
        debug!(
            "indexed {} of {} notes under {vault_root_path}",
            metadata.len(),
            files.len()
        );
        self.files = files;
        self.metadata = metadata;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.metadata.is_empty()
    }

    pub fn files(&self) -> &[NoteIdentity] {
        &self.files
    }

    pub fn meta(&self, path: &str) -> Option<&NoteMeta> {
        self.metadata.get(path)
    }

    /// Notes per status bucket, recomputed from the full metadata map.
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for meta in self.metadata.values() {
            match meta.status.as_deref().and_then(NoteStatus::parse) {
                Some(NoteStatus::Active) => counts.active += 1,
                Some(NoteStatus::OnHold) => counts.on_hold += 1,
                Some(NoteStatus::Completed) => counts.completed += 1,
                Some(NoteStatus::Dropped) => counts.dropped += 1,
                None => {}
            }
        }
        counts
    }

    /// Union of every tag seen in this vault. Grows on save, never shrinks
    /// until the vault is switched.
    pub fn tag_universe(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Notes whose cached status matches. Notes that failed to parse have no
    /// cache entry and are excluded.
    pub fn filter_by_status(&self, status: NoteStatus) -> Vec<NoteIdentity> {
        self.files
            .iter()
            .filter(|f| {
                self.metadata
                    .get(&f.path)
                    .and_then(|m| m.status.as_deref())
                    .and_then(NoteStatus::parse)
                    == Some(status)
            })
            .cloned()
            .collect()
    }

    pub fn filter_by_tag(&self, tag: &str) -> Vec<NoteIdentity> {
        self.files
            .iter()
            .filter(|f| {
                self.metadata
                    .get(&f.path)
                    .and_then(|m| m.tags.as_ref())
                    .is_some_and(|tags| tags.iter().any(|t| t == tag))
            })
            .cloned()
            .collect()
    }

    /// Patch the cache after a successful save: wholesale replacement of the
    /// entry plus a tag-universe extension. Never triggers a rescan.
    pub fn apply_save(&mut self, path: &str, meta: NoteMeta) {
        if let Some(tags) = &meta.tags {
            self.tags.extend(tags.iter().cloned());
        }
        self.metadata.insert(path.to_string(), meta);
    }

    /// Register a freshly created note.
    pub fn apply_create(&mut self, identity: NoteIdentity, meta: NoteMeta) {
        self.apply_save(&identity.path, meta);
        self.files.push(identity);
    }

    /// Move a note's cache entry on rename. The value moves without a
    /// re-parse; if the old path had no entry, none is created for the new
    /// path either — a miss is preserved, not healed.
    pub fn apply_rename(&mut self, old_path: &str, new_path: &str) {
        if let Some(meta) = self.metadata.remove(old_path) {
            self.metadata.insert(new_path.to_string(), meta);
        }
        for file in &mut self.files {
            if file.path == old_path {
                file.path = new_path.to_string();
                file.name = display_name(new_path);
            }
        }
    }

    /// Drop everything. Called before a different vault is opened so stale
    /// cross-vault metadata can never leak into counts or filters.
    pub fn clear(&mut self) {
        self.files.clear();
        self.metadata.clear();
        self.tags.clear();
    }
}
