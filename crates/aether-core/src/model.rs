use serde::{Deserialize, Serialize};

/// File extension (including the dot) that marks a file as a note.
/// The suffix match is case-sensitive.
pub const NOTE_EXTENSION: &str = ".md";

/// The `(name, path)` pair referencing a note.
///
/// The path is the sole stable identity; the name is derived from the file
/// name and may collide across folders. A rename destroys the old identity
/// and yields a new one that the index re-associates with the same note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteIdentity {
    /// Display title: file name without the note extension.
    pub name: String,
    /// Unique identifier, in whatever separator convention the gateway uses.
    pub path: String,
}

/// One node of the vault folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    /// Unique within the tree.
    pub path: String,
    #[serde(default)]
    pub subfolders: Vec<FolderNode>,
    /// Raw file names (with extension) of immediate children only. The tree
    /// never flattens files across levels.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Structured metadata carried in a note's frontmatter block.
///
/// A note without frontmatter has every field absent; that is a normal state,
/// not an error. The index replaces a note's metadata wholesale on every
/// save instead of mutating it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    /// Unique by value, in authoring order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Lower-cased status string, stored as authored. Values outside the four
    /// recognized buckets are kept and simply count toward no bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl NoteMeta {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.pinned.is_none() && self.tags.is_none() && self.status.is_none()
    }
}

/// The four recognized status buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Active,
    #[serde(rename = "on hold")]
    OnHold,
    Completed,
    Dropped,
}

impl NoteStatus {
    /// Map a stored status string onto a bucket. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "on hold" => Some(Self::OnHold),
            "completed" => Some(Self::Completed),
            "dropped" => Some(Self::Dropped),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnHold => "on hold",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

/// Notes per status bucket. Notes with an unset or unrecognized status
/// contribute to none of the four.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub active: usize,
    #[serde(rename = "on hold")]
    pub on_hold: usize,
    pub completed: usize,
    pub dropped: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.active + self.on_hold + self.completed + self.dropped
    }
}

/// The single active view constraint. `None` at the call sites that hold an
/// `Option<ActiveFilter>` means "All Notes". Selecting a folder clears the
/// filter and vice versa; the two are never active simultaneously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ActiveFilter {
    Status(NoteStatus),
    Tag(String),
}
