//! Note file lifecycle: create, rename/save-as, save.

use std::sync::Arc;

use log::warn;

use crate::error::VaultError;
use crate::gateway::{FilesystemGateway, GatewayCapabilities};
use crate::model::{NoteIdentity, NOTE_EXTENSION};

pub(crate) const DEFAULT_BASE_NAME: &str = "Untitled";
pub(crate) const DEFAULT_CONTENT: &str = "\n";

/// Characters that cannot appear in a file name on any supported host.
const ILLEGAL_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Disk mutations for a single vault.
///
/// Holds the gateway plus its capability descriptor, captured once at
/// construction, so the rename fallback chain never probes capabilities at
/// call time.
pub struct NoteLifecycle {
    gateway: Arc<dyn FilesystemGateway>,
    capabilities: GatewayCapabilities,
}

impl NoteLifecycle {
    pub fn new(gateway: Arc<dyn FilesystemGateway>) -> Self {
        let capabilities = gateway.capabilities();
        Self {
            gateway,
            capabilities,
        }
    }

    /// Create a new note in `dir_path`. The gateway handles name collisions;
    /// this fills in the defaults and derives the identity from the created
    /// path.
    pub fn create_note(
        &self,
        dir_path: &str,
        base_name: Option<&str>,
        initial_content: Option<&str>,
    ) -> Result<NoteIdentity, VaultError> {
        let path = self.gateway.create_unique_note(
            dir_path,
            base_name.unwrap_or(DEFAULT_BASE_NAME),
            initial_content.unwrap_or(DEFAULT_CONTENT),
        )?;
        Ok(NoteIdentity {
            name: display_name(&path),
            path,
        })
    }

    /// Rename a note, or save it in place when renaming is impossible.
    ///
    /// Three tiers, strongest guarantee first:
    /// 1. atomic rename/move, then rewrite the moved file with the current
    ///    in-memory content (the move alone only carries prior on-disk bytes);
    /// 2. write to the new path, then best-effort delete of the old one; a
    ///    failed delete leaves an orphaned duplicate and is only logged;
    /// 3. neither primitive available: write to the old path and return it
    ///    unchanged, so the caller can surface "rename unsupported".
    pub fn rename_or_save_as_new(
        &self,
        old_path: &str,
        new_base_name: &str,
        content: &str,
    ) -> Result<String, VaultError> {
        let new_path = derive_sibling_path(old_path, &sanitize_base_name(new_base_name));

        if new_path == old_path {
            // Content-only save.
            self.gateway.write_text_file(old_path, content)?;
            return Ok(new_path);
        }

        if self.capabilities.rename {
            self.gateway.rename_or_move(old_path, &new_path)?;
            self.gateway.write_text_file(&new_path, content)?;
            return Ok(new_path);
        }

        if self.capabilities.delete {
            // Write before delete so a failed delete cannot lose content.
            self.gateway.write_text_file(&new_path, content)?;
            if let Err(err) = self.gateway.delete_file(old_path) {
                warn!("leaving orphaned note at {old_path} after rename: {err}");
            }
            return Ok(new_path);
        }

        warn!("gateway supports neither rename nor delete; saving {old_path} in place");
        self.gateway.write_text_file(old_path, content)?;
        Ok(old_path.to_string())
    }

    /// Passthrough write. No retry.
    pub fn save_note(&self, path: &str, content: &str) -> Result<(), VaultError> {
        self.gateway.write_text_file(path, content)
    }
}

/// Strip characters that are illegal in file names, collapse whitespace runs,
/// and fall back to "Untitled" when nothing usable remains.
pub fn sanitize_base_name(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.chars().all(|c| c == '.') {
        DEFAULT_BASE_NAME.to_string()
    } else {
        collapsed
    }
}

/// Replace the last segment of `old_path` with `base_name` plus the note
/// extension, reusing whichever separator the path already carries.
fn derive_sibling_path(old_path: &str, base_name: &str) -> String {
    match old_path.rfind(['/', '\\']) {
        Some(idx) => format!("{}{base_name}{NOTE_EXTENSION}", &old_path[..=idx]),
        None => format!("{base_name}{NOTE_EXTENSION}"),
    }
}

/// Last path segment without the note extension.
pub(crate) fn display_name(path: &str) -> String {
    let last = path.rsplit(['/', '\\']).next().unwrap_or(path);
    last.strip_suffix(NOTE_EXTENSION).unwrap_or(last).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryGateway;

    #[test]
    fn test_sanitize_base_name() {
        assert_eq!(sanitize_base_name("Plan: Q3 *draft*"), "Plan Q3 draft");
        assert_eq!(sanitize_base_name("a/b\\c<d>e|f?g\"h"), "abcdefgh");
        assert_eq!(sanitize_base_name("  spaced   out  "), "spaced out");
        assert_eq!(sanitize_base_name(""), "Untitled");
        assert_eq!(sanitize_base_name("***"), "Untitled");
        assert_eq!(sanitize_base_name("..."), "Untitled");
    }

    #[test]
    fn test_derive_sibling_path_keeps_separator_convention() {
        assert_eq!(derive_sibling_path("/v/sub/old.md", "new"), "/v/sub/new.md");
        assert_eq!(
            derive_sibling_path("C:\\v\\old.md", "new"),
            "C:\\v\\new.md"
        );
        assert_eq!(derive_sibling_path("old.md", "new"), "new.md");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/v/sub/note.md"), "note");
        assert_eq!(display_name("C:\\v\\note.md"), "note");
        assert_eq!(display_name("plain.md"), "plain");
    }

    #[test]
    fn test_create_note_defaults() {
        let gateway = Arc::new(MemoryGateway::new());
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let first = lifecycle.create_note("/vault", None, None).unwrap();
        let second = lifecycle.create_note("/vault", None, None).unwrap();

        assert_eq!(first.name, "Untitled");
        assert_eq!(first.path, "/vault/Untitled.md");
        assert_eq!(second.name, "Untitled 1");
        assert_eq!(gateway.content("/vault/Untitled.md").unwrap(), "\n");
    }

    #[test]
    fn test_rename_content_only_save() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.insert("/v/note.md", "old body");
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let path = lifecycle
            .rename_or_save_as_new("/v/note.md", "note", "new body")
            .unwrap();

        assert_eq!(path, "/v/note.md");
        assert_eq!(gateway.content("/v/note.md").unwrap(), "new body");
    }

    #[test]
    fn test_rename_tier_one_atomic_move_then_rewrite() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.insert("/v/old.md", "stale bytes");
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let path = lifecycle
            .rename_or_save_as_new("/v/old.md", "new", "edited")
            .unwrap();

        assert_eq!(path, "/v/new.md");
        assert!(gateway.content("/v/old.md").is_none());
        assert_eq!(
            gateway.content("/v/new.md").unwrap(),
            "edited",
            "latest in-memory edits must be flushed after the move"
        );
    }

    #[test]
    fn test_rename_tier_two_write_then_delete() {
        let gateway = Arc::new(MemoryGateway::new().without_rename());
        gateway.insert("/v/old.md", "body");
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let path = lifecycle
            .rename_or_save_as_new("/v/old.md", "new", "body")
            .unwrap();

        assert_eq!(path, "/v/new.md");
        assert!(gateway.content("/v/old.md").is_none());
        assert_eq!(gateway.content("/v/new.md").unwrap(), "body");
    }

    #[test]
    fn test_rename_tier_two_swallows_delete_failure() {
        let gateway = Arc::new(MemoryGateway::new().without_rename().failing_delete());
        gateway.insert("/v/old.md", "body");
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let path = lifecycle
            .rename_or_save_as_new("/v/old.md", "new", "body")
            .unwrap();

        assert_eq!(path, "/v/new.md");
        assert_eq!(gateway.content("/v/new.md").unwrap(), "body");
        assert!(
            gateway.content("/v/old.md").is_some(),
            "orphaned duplicate is an accepted risk, not an error"
        );
    }

    #[test]
    fn test_rename_tier_three_saves_in_place() {
        let gateway = Arc::new(MemoryGateway::new().without_rename().without_delete());
        gateway.insert("/v/old.md", "body");
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let path = lifecycle
            .rename_or_save_as_new("/v/old.md", "new", "edited")
            .unwrap();

        assert_eq!(path, "/v/old.md", "unchanged path signals rename unsupported");
        assert!(gateway.content("/v/new.md").is_none(), "no duplicate created");
        assert_eq!(gateway.content("/v/old.md").unwrap(), "edited");
    }

    #[test]
    fn test_rename_sanitizes_new_base_name() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.insert("/v/old.md", "body");
        let lifecycle = NoteLifecycle::new(gateway.clone());

        let path = lifecycle
            .rename_or_save_as_new("/v/old.md", "a/b: c?", "body")
            .unwrap();

        assert_eq!(path, "/v/ab c.md");
    }
}
