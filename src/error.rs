use std::path::PathBuf;

/// Failures at the edges of the crate: reading documents and running
/// filters. Codec, store and collection operations never produce these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object payload must be a mapping, found {found}")]
    NotAnObject { found: &'static str },
    #[error("at JSON path {path} → {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("jq filter failed: {0}")]
    Jq(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
