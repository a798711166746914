use crate::season::SnapshotKey;
use thiserror::Error;

/// Structural failures. These abort the operation and are reported to the caller.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Invalid season '{key}'. Use: {}", SnapshotKey::valid_list())]
    InvalidKey { key: String },

    #[error("{service} not available.")]
    ServiceUnavailable { service: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Failures raised by a host collaborator for a single entity or service call.
/// Bulk operations isolate these per entity and keep going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("destroy failed: {0}")]
    Destroy(String),

    #[error("instantiation failed: {0}")]
    Instantiation(String),

    #[error("placement failed: {0}")]
    Placement(String),

    #[error("attribute unreadable: {0}")]
    Attribute(String),

    #[error("{0} not available")]
    ServiceUnavailable(&'static str),
}

pub type HostResult<T> = Result<T, HostError>;

/// A console line that does not name a known command or carries a bad argument.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
