use serde::{Deserialize, Serialize};

use crate::path::FilerPath;
use crate::permission::FsPermission;

/// Replication reported for every entry; the filer does not expose its own
pub const BLOCK_REPLICATION: u16 = 1;

/// Block size reported for every entry
pub const BLOCK_SIZE: u64 = 512;

/// Filesystem-facing metadata for one entry, built fresh on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    pub length: u64,
    pub is_directory: bool,
    pub block_replication: u16,
    pub block_size: u64,
    /// Seconds since epoch
    pub modification_time: i64,
    /// Not tracked by the filer, always 0
    pub access_time: i64,
    pub permission: FsPermission,
    pub owner: String,
    /// Primary group only
    pub group: String,
    pub path: FilerPath,
}
