use std::sync::Arc;

use tracing::{debug, warn};

use filerfs_platform::client::{
    AtomicRenameEntryRequest, CreateEntryRequest, DeleteEntryRequest, FilerClient,
    ListEntriesRequest, LookupDirectoryEntryRequest, UpdateEntryRequest,
};
use filerfs_platform::entry::{Entry, FuseAttributes};

use crate::attributes;
use crate::config::{ListingMode, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::identity::UserIdentity;
use crate::path::{resolve, FilerPath};
use crate::permission::FsPermission;
use crate::status::FileStatus;

/// Filesystem operations on top of a filer client.
///
/// Holds no state besides the client handle and its config: every call
/// resolves the path, sends the request and maps the answer. Nothing is
/// cached and nothing is retried, so clones can be used from any number of
/// tasks at once.
#[derive(Clone)]
pub struct FilerStore {
    client: Arc<dyn FilerClient>,
    config: StoreConfig,
}

impl FilerStore {
    pub fn new(client: Arc<dyn FilerClient>) -> Self {
        Self::with_config(client, StoreConfig::default())
    }

    pub fn with_config(client: Arc<dyn FilerClient>, config: StoreConfig) -> Self {
        Self { client, config }
    }

    /// Build a store from the config at `path`, or the per-user default
    /// location when `None`
    pub fn from_config_file(
        client: Arc<dyn FilerClient>,
        path: Option<&std::path::Path>,
    ) -> anyhow::Result<Self> {
        Ok(Self::with_config(client, StoreConfig::load_or_default(path)?))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create the directory `path` owned by `user`. The parent must already
    /// exist. `umask` is accepted for interface compatibility and not applied:
    /// the mode is stored exactly as `permission`.
    pub async fn create_directory(
        &self,
        path: &FilerPath,
        user: &UserIdentity,
        permission: FsPermission,
        umask: FsPermission,
    ) -> StoreResult<bool> {
        debug!(
            "create directory: {} (permission {}, umask {})",
            path, permission, umask
        );

        let (parent, name) = resolve(path)?;
        let attrs = attributes::new_entry_attributes(permission, user, attributes::unix_now());

        let resp = self
            .client
            .create_entry(CreateEntryRequest {
                directory: parent.to_string(),
                entry: Entry::directory(name, attrs),
            })
            .await?;
        check_status("create", path, &resp.error)?;
        Ok(true)
    }

    /// Status of every child of `path`, in the order the filer returns them
    pub async fn list_entries(&self, path: &FilerPath) -> StoreResult<Vec<FileStatus>> {
        debug!("list entries: {}", path);

        let entries = match self.config.listing {
            ListingMode::SinglePage => self.list_page(path, String::new()).await?,
            ListingMode::Paginated => self.list_all(path).await?,
        };

        let mut statuses = Vec::with_capacity(entries.len());
        for entry in &entries {
            let child = path.child(&entry.name).map_err(|_| {
                StoreError::RemoteFailure(format!(
                    "filer returned malformed entry name {:?} under {}",
                    entry.name, path
                ))
            })?;
            statuses.push(attributes::to_file_status(child, entry));
        }
        Ok(statuses)
    }

    pub async fn get_file_status(&self, path: &FilerPath) -> StoreResult<FileStatus> {
        debug!("file status: {}", path);

        let (parent, name) = resolve(path)?;
        let resp = self
            .client
            .lookup_directory_entry(LookupDirectoryEntryRequest {
                directory: parent.to_string(),
                name: name.to_string(),
            })
            .await?;
        Ok(attributes::to_file_status(path.clone(), &resp.entry))
    }

    /// Delete `path` together with its data. `recursive` is forwarded to the
    /// filer as a hint and not checked here; whether a non-empty directory may
    /// go is the filer's call.
    pub async fn delete_entries(
        &self,
        path: &FilerPath,
        is_directory: bool,
        recursive: bool,
    ) -> StoreResult<bool> {
        debug!(
            "delete: {} (directory {}, recursive {})",
            path, is_directory, recursive
        );

        let (parent, name) = resolve(path)?;
        let resp = self
            .client
            .delete_entry(DeleteEntryRequest {
                directory: parent.to_string(),
                name: name.to_string(),
                is_directory,
                is_delete_data: true,
                is_recursive: recursive,
            })
            .await?;
        check_status("delete", path, &resp.error)?;
        Ok(true)
    }

    /// Change the owner and/or primary group. Passing neither is a no-op.
    pub async fn set_owner(
        &self,
        path: &FilerPath,
        user_name: Option<&str>,
        group: Option<&str>,
    ) -> StoreResult<()> {
        debug!("set owner: {} (user {:?}, group {:?})", path, user_name, group);
        if user_name.is_none() && group.is_none() {
            return Ok(());
        }

        self.update_attributes(path, "set owner", |attrs| {
            attributes::set_owner(attrs, user_name, group)
        })
        .await
    }

    pub async fn set_permission(
        &self,
        path: &FilerPath,
        permission: FsPermission,
    ) -> StoreResult<()> {
        debug!("set permission: {} {}", path, permission);

        self.update_attributes(path, "set permission", |attrs| {
            attributes::set_permission(attrs, permission)
        })
        .await
    }

    /// Update the modification time. Access times are not kept by the filer,
    /// so `atime` is dropped.
    pub async fn set_times(
        &self,
        path: &FilerPath,
        mtime: Option<i64>,
        atime: Option<i64>,
    ) -> StoreResult<()> {
        debug!("set times: {} (mtime {:?}, atime {:?})", path, mtime, atime);
        let Some(mtime) = mtime else {
            return Ok(());
        };

        self.update_attributes(path, "set times", |attrs| attrs.mtime = mtime)
            .await
    }

    pub async fn rename(&self, src: &FilerPath, dst: &FilerPath) -> StoreResult<()> {
        debug!("rename: {} -> {}", src, dst);

        let (old_parent, old_name) = resolve(src)?;
        let (new_parent, new_name) = resolve(dst)?;
        if src == dst {
            return Ok(());
        }

        let resp = self
            .client
            .atomic_rename_entry(AtomicRenameEntryRequest {
                old_directory: old_parent.to_string(),
                old_name: old_name.to_string(),
                new_directory: new_parent.to_string(),
                new_name: new_name.to_string(),
            })
            .await?;
        check_status("rename", src, &resp.error)
    }

    async fn list_page(&self, path: &FilerPath, start_from: String) -> StoreResult<Vec<Entry>> {
        let resp = self
            .client
            .list_entries(ListEntriesRequest {
                directory: path.to_string(),
                start_from_file_name: start_from,
                inclusive_start_from: false,
                limit: self.config.page_size(),
                ..Default::default()
            })
            .await?;
        Ok(resp.entries)
    }

    async fn list_all(&self, path: &FilerPath) -> StoreResult<Vec<Entry>> {
        let page_size = self.config.page_size() as usize;
        let mut entries = Vec::new();
        let mut start_from = String::new();

        loop {
            let page = self.list_page(path, start_from.clone()).await?;
            debug!(
                "list entries: {} page of {} after {:?}",
                path,
                page.len(),
                start_from
            );

            if page.len() < page_size {
                entries.extend(page);
                return Ok(entries);
            }

            // a full page must end past the cursor or the next request repeats it
            let next = match page.last() {
                Some(last) if last.name > start_from => last.name.clone(),
                _ => {
                    warn!("list entries: {} stuck after {:?}", path, start_from);
                    return Err(StoreError::RemoteFailure(format!(
                        "listing of {} made no progress after {:?}",
                        path, start_from
                    )));
                }
            };
            start_from = next;
            entries.extend(page);
        }
    }

    async fn update_attributes<F>(&self, path: &FilerPath, op: &str, change: F) -> StoreResult<()>
    where
        F: FnOnce(&mut FuseAttributes),
    {
        let (parent, name) = resolve(path)?;
        let mut entry = self
            .client
            .lookup_directory_entry(LookupDirectoryEntryRequest {
                directory: parent.to_string(),
                name: name.to_string(),
            })
            .await?
            .entry;
        change(&mut entry.attributes);

        let resp = self
            .client
            .update_entry(UpdateEntryRequest {
                directory: parent.to_string(),
                entry,
            })
            .await?;
        check_status(op, path, &resp.error)
    }
}

/// Filer responses report failure through a status string rather than an RPC error
fn check_status(op: &str, path: &FilerPath, error: &str) -> StoreResult<()> {
    if error.is_empty() {
        return Ok(());
    }
    warn!("{} {} rejected by filer: {}", op, path, error);
    Err(StoreError::RemoteFailure(format!("{} {}: {}", op, path, error)))
}
