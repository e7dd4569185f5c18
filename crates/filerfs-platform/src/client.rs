use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::Entry;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("filer error: {0}")]
    Remote(String),
    #[error("transport error: {0:#}")]
    Transport(#[from] anyhow::Error),
}

pub type RpcResult<T> = Result<T, RpcError>;

// --- Request/response records ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub directory: String,
    pub entry: Entry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryResponse {
    /// Empty on success
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntriesRequest {
    pub directory: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_from_file_name: String,
    #[serde(default)]
    pub inclusive_start_from: bool,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntriesResponse {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupDirectoryEntryRequest {
    pub directory: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupDirectoryEntryResponse {
    pub entry: Entry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEntryRequest {
    pub directory: String,
    pub name: String,
    pub is_directory: bool,
    pub is_delete_data: bool,
    /// Hint for the filer; never checked on the client side
    #[serde(default)]
    pub is_recursive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub directory: String,
    pub entry: Entry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntryResponse {
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicRenameEntryRequest {
    pub old_directory: String,
    pub old_name: String,
    pub new_directory: String,
    pub new_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicRenameEntryResponse {
    #[serde(default)]
    pub error: String,
}

/// Request/response client for the filer's metadata service.
///
/// Every entry is addressed by its parent directory plus its name. Implementors
/// own connection handling, retries and timeouts; callers share one client
/// across tasks, so it must be safe to use concurrently.
#[async_trait]
pub trait FilerClient: Send + Sync {
    async fn create_entry(&self, req: CreateEntryRequest) -> RpcResult<CreateEntryResponse>;

    /// Entries of `req.directory` in the filer's order, at most `req.limit` of them
    async fn list_entries(&self, req: ListEntriesRequest) -> RpcResult<ListEntriesResponse>;

    /// Fails with `RpcError::NotFound` when no such entry exists
    async fn lookup_directory_entry(
        &self,
        req: LookupDirectoryEntryRequest,
    ) -> RpcResult<LookupDirectoryEntryResponse>;

    async fn delete_entry(&self, req: DeleteEntryRequest) -> RpcResult<DeleteEntryResponse>;

    async fn update_entry(&self, req: UpdateEntryRequest) -> RpcResult<UpdateEntryResponse>;

    async fn atomic_rename_entry(
        &self,
        req: AtomicRenameEntryRequest,
    ) -> RpcResult<AtomicRenameEntryResponse>;
}
