//! Vault tree reading: typed folder structure and note enumeration.

use crate::error::VaultError;
use crate::gateway::FilesystemGateway;
use crate::model::{FolderNode, NoteIdentity, NOTE_EXTENSION};

/// Read the full folder structure of a vault. The result is a single-element
/// list whose one node is the vault root.
pub fn read_vault_structure(
    gateway: &dyn FilesystemGateway,
    root_path: &str,
) -> Result<Vec<FolderNode>, VaultError> {
    gateway.list_directory(root_path)
}

/// Notes that are immediate children of one folder. Not recursive.
pub fn read_markdown_files(
    gateway: &dyn FilesystemGateway,
    folder_path: &str,
) -> Result<Vec<NoteIdentity>, VaultError> {
    let tree = gateway.list_directory(folder_path)?;
    Ok(tree
        .first()
        .map(|folder| {
            folder
                .files
                .iter()
                .filter_map(|file| note_identity(folder, file))
                .collect()
        })
        .unwrap_or_default())
}

/// Every note in the vault, flattened depth-first across the whole tree.
/// Ordering is stable but not sorted; callers use it for display only.
pub fn read_all_markdown_files(
    gateway: &dyn FilesystemGateway,
    vault_root_path: &str,
) -> Result<Vec<NoteIdentity>, VaultError> {
    let tree = gateway.list_directory(vault_root_path)?;
    let mut notes = Vec::new();
    for folder in &tree {
        collect_notes(folder, &mut notes);
    }
    Ok(notes)
}

fn collect_notes(folder: &FolderNode, out: &mut Vec<NoteIdentity>) {
    for file in &folder.files {
        if let Some(identity) = note_identity(folder, file) {
            out.push(identity);
        }
    }
    for sub in &folder.subfolders {
        collect_notes(sub, out);
    }
}

fn note_identity(folder: &FolderNode, file_name: &str) -> Option<NoteIdentity> {
    let name = file_name.strip_suffix(NOTE_EXTENSION)?;
    Some(NoteIdentity {
        name: name.to_string(),
        path: join_path(&folder.path, file_name),
    })
}

/// Join a folder path with a child name using whichever separator convention
/// the folder path already carries. Gateways on Windows hosts hand back
/// backslash paths and the tree is not canonicalized on ingestion, so the
/// separator is inferred per folder.
pub(crate) fn join_path(folder_path: &str, child: &str) -> String {
    let sep = if folder_path.contains('\\') { '\\' } else { '/' };
    let trimmed = folder_path.trim_end_matches(['/', '\\']);
    format!("{trimmed}{sep}{child}")
}
