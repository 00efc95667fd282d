use thiserror::Error;

/// Errors surfaced by the vault core.
///
/// Leaf operations bubble these with `?`; the lifecycle and index layers
/// decide per call site whether to recover (log and fall back) or propagate.
/// Malformed frontmatter is deliberately not represented here: parse leniency
/// degrades it to empty metadata instead.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A required gateway capability is missing from the host.
    #[error("gateway capability `{0}` is not available")]
    GatewayUnavailable(&'static str),

    /// An action that needs an open vault was invoked before one was opened.
    #[error("no vault is open")]
    NoVaultOpen,

    #[error("failed to list directory `{path}`")]
    ListDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read `{path}`")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{path}`")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move `{from}` to `{to}`")]
    Move {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete `{path}`")]
    Delete {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create a note in `{dir}`")]
    CreateNote {
        dir: String,
        #[source]
        source: std::io::Error,
    },
}
