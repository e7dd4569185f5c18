// Mapping between filer attribute records and filesystem metadata

use std::time::{SystemTime, UNIX_EPOCH};

use filerfs_platform::entry::{Entry, FuseAttributes};

use crate::identity::UserIdentity;
use crate::path::FilerPath;
use crate::permission::FsPermission;
use crate::status::{FileStatus, BLOCK_REPLICATION, BLOCK_SIZE};

/// Attributes for a freshly created entry owned by `user`. Both timestamps
/// are set to `now`; the full group list is written, primary group first.
pub fn new_entry_attributes(
    permission: FsPermission,
    user: &UserIdentity,
    now: i64,
) -> FuseAttributes {
    FuseAttributes {
        file_size: 0,
        mtime: now,
        crtime: now,
        file_mode: permission.to_short() as u32,
        user_name: user.user_name.clone(),
        group_name: user.group_names.clone(),
        ..Default::default()
    }
}

/// Project a filer entry onto the filesystem status of `path`
pub fn to_file_status(path: FilerPath, entry: &Entry) -> FileStatus {
    let attrs = &entry.attributes;
    FileStatus {
        length: attrs.file_size,
        is_directory: entry.is_directory,
        block_replication: BLOCK_REPLICATION,
        block_size: BLOCK_SIZE,
        modification_time: attrs.mtime,
        access_time: 0,
        permission: FsPermission::from_mode(attrs.file_mode),
        owner: attrs.user_name.clone(),
        group: attrs.group_name.first().cloned().unwrap_or_default(),
        path,
    }
}

/// Replace the owner and/or the primary group, keeping secondary groups
pub fn set_owner(attrs: &mut FuseAttributes, user_name: Option<&str>, group: Option<&str>) {
    if let Some(user_name) = user_name {
        attrs.user_name = user_name.to_string();
    }
    if let Some(group) = group {
        match attrs.group_name.first_mut() {
            Some(primary) => *primary = group.to_string(),
            None => attrs.group_name.push(group.to_string()),
        }
    }
}

pub fn set_permission(attrs: &mut FuseAttributes, permission: FsPermission) {
    attrs.file_mode = permission.to_short() as u32;
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
