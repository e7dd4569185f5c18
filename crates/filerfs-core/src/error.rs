use std::io;

use filerfs_platform::client::RpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Path is malformed or has no parent where one is required. Raised before
    /// any request leaves the process.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// The filer rejected the request or answered with an error status
    #[error("remote failure: {0}")]
    RemoteFailure(String),
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<RpcError> for StoreError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::NotFound(what) => Self::NotFound(what),
            RpcError::Remote(msg) => Self::RemoteFailure(msg),
            RpcError::Transport(e) => Self::Transport(e),
        }
    }
}

impl From<StoreError> for io::Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            StoreError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            StoreError::RemoteFailure(msg) => io::Error::other(msg),
            StoreError::Transport(e) => io::Error::other(format!("{:#}", e)),
        }
    }
}
