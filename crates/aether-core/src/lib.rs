//! Aether Vault Core
//!
//! Vault indexing and metadata engine for the Aether note-taking app: walks a
//! vault directory into a folder tree, parses per-note frontmatter into an
//! in-memory metadata index, and keeps that index consistent with disk
//! through the note lifecycle operations (create, rename, save).
//!
//! All I/O goes through the [`FilesystemGateway`] capability trait; the host
//! process supplies the implementation (a local-disk one is included).

pub mod error;
pub mod frontmatter;
pub mod gateway;
pub mod index;
pub mod lifecycle;
pub mod model;
pub mod tree;
pub mod vault;

#[cfg(test)]
pub(crate) mod testing;

pub use error::VaultError;
pub use gateway::{FilesystemGateway, GatewayCapabilities, PhysicalGateway};
pub use index::VaultIndex;
pub use lifecycle::NoteLifecycle;
pub use model::{
    ActiveFilter, FolderNode, NoteIdentity, NoteMeta, NoteStatus, StatusCounts, NOTE_EXTENSION,
};
pub use vault::{Vault, VaultSnapshot};
