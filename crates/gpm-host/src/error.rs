//! Error types for the host runtime.

use gpm_protocol::{DebugInfo, HostError};
use thiserror::Error;

/// Host integration failures: anything between the add-in and the document.
#[derive(Debug, Error)]
pub enum Error {
    /// The host rejected an operation.
    #[error("{}", .0.message)]
    Host(#[from] HostError),

    /// An `add_sheet` was queued while a delete of the same name was pending.
    #[error("Sheet '{0}' is being deleted in this batch; sync before re-creating it")]
    NameReuse(String),

    /// A [`Loaded`](crate::Loaded) value was read before its batch was synced.
    #[error("{0} was read before the request context was synced")]
    NotLoaded(&'static str),

    #[error("Host returned {actual} results for {expected} operations")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("Unexpected response from host")]
    UnexpectedResponse,

    #[error("Host process not found: {0}")]
    HostNotFound(String),

    #[error("Failed to spawn host process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Host process not running")]
    NotRunning,

    #[error("Failed to send command to host: {0}")]
    SendFailed(#[source] std::io::Error),

    #[error("Failed to read response from host: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The host's diagnostic payload, when the host supplied one.
    pub fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            Error::Host(e) => e.debug_info.as_ref(),
            _ => None,
        }
    }

    /// The host error code, when the host reported the failure.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Host(e) => Some(&e.code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
