use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use filerfs_platform::client::{
    AtomicRenameEntryRequest, AtomicRenameEntryResponse, CreateEntryRequest, CreateEntryResponse,
    DeleteEntryRequest, DeleteEntryResponse, FilerClient, ListEntriesRequest, ListEntriesResponse,
    LookupDirectoryEntryRequest, LookupDirectoryEntryResponse, RpcError, RpcResult,
    UpdateEntryRequest, UpdateEntryResponse,
};
use filerfs_platform::entry::Entry;

const ROOT: &str = "/";

/// Directory path -> children keyed by name
type Tree = BTreeMap<String, BTreeMap<String, Entry>>;

/// Filer that keeps its namespace in memory.
///
/// Follows the remote service's addressing rules: entries live under an
/// existing parent directory, listings come back sorted by name, and deleting a
/// non-empty directory needs the recursive hint. Contents are lost on drop.
#[derive(Debug)]
pub struct MemoryFiler {
    tree: RwLock<Tree>,
}

impl Default for MemoryFiler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFiler {
    /// Create a filer holding only the root directory
    pub fn new() -> Self {
        let mut tree = Tree::new();
        tree.insert(ROOT.to_string(), BTreeMap::new());
        Self {
            tree: RwLock::new(tree),
        }
    }

    /// Number of entries below the root, at any depth
    pub fn len(&self) -> usize {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RpcResult<RwLockReadGuard<'_, Tree>> {
        self.tree
            .read()
            .map_err(|_| RpcError::Remote("lock poisoned".to_string()))
    }

    fn write(&self) -> RpcResult<RwLockWriteGuard<'_, Tree>> {
        self.tree
            .write()
            .map_err(|_| RpcError::Remote("lock poisoned".to_string()))
    }
}

fn full_path(directory: &str, name: &str) -> String {
    if directory == ROOT {
        format!("/{}", name)
    } else {
        format!("{}/{}", directory, name)
    }
}

/// Keys of `dir` and every directory nested below it
fn subtree_keys(tree: &Tree, dir: &str) -> Vec<String> {
    let nested = format!("{}/", dir);
    tree.keys()
        .filter(|k| k.as_str() == dir || k.starts_with(&nested))
        .cloned()
        .collect()
}

#[async_trait]
impl FilerClient for MemoryFiler {
    async fn create_entry(&self, req: CreateEntryRequest) -> RpcResult<CreateEntryResponse> {
        let mut tree = self.write()?;
        let name = req.entry.name.clone();
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Ok(CreateEntryResponse {
                error: format!("invalid entry name {:?}", name),
            });
        }

        let children = tree
            .get_mut(&req.directory)
            .ok_or_else(|| RpcError::NotFound(req.directory.clone()))?;

        if let Some(existing) = children.get(&name) {
            if existing.is_directory != req.entry.is_directory {
                return Ok(CreateEntryResponse {
                    error: format!(
                        "existing entry {} has a different type",
                        full_path(&req.directory, &name)
                    ),
                });
            }
        }

        let is_directory = req.entry.is_directory;
        children.insert(name.clone(), req.entry);
        if is_directory {
            tree.entry(full_path(&req.directory, &name)).or_default();
        }
        debug!("memory filer: created {}", full_path(&req.directory, &name));
        Ok(CreateEntryResponse::default())
    }

    async fn list_entries(&self, req: ListEntriesRequest) -> RpcResult<ListEntriesResponse> {
        let tree = self.read()?;
        let children = tree
            .get(&req.directory)
            .ok_or_else(|| RpcError::NotFound(req.directory.clone()))?;

        let lower = if req.start_from_file_name.is_empty() {
            Bound::Unbounded
        } else if req.inclusive_start_from {
            Bound::Included(req.start_from_file_name.clone())
        } else {
            Bound::Excluded(req.start_from_file_name.clone())
        };

        let entries = children
            .range((lower, Bound::Unbounded))
            .filter(|(name, _)| name.starts_with(&req.prefix))
            .take(req.limit as usize)
            .map(|(_, entry)| entry.clone())
            .collect();

        Ok(ListEntriesResponse { entries })
    }

    async fn lookup_directory_entry(
        &self,
        req: LookupDirectoryEntryRequest,
    ) -> RpcResult<LookupDirectoryEntryResponse> {
        let tree = self.read()?;
        tree.get(&req.directory)
            .and_then(|children| children.get(&req.name))
            .map(|entry| LookupDirectoryEntryResponse {
                entry: entry.clone(),
            })
            .ok_or_else(|| RpcError::NotFound(full_path(&req.directory, &req.name)))
    }

    async fn delete_entry(&self, req: DeleteEntryRequest) -> RpcResult<DeleteEntryResponse> {
        let mut tree = self.write()?;
        let path = full_path(&req.directory, &req.name);
        let is_directory = tree
            .get(&req.directory)
            .and_then(|children| children.get(&req.name))
            .map(|entry| entry.is_directory)
            .ok_or_else(|| RpcError::NotFound(path.clone()))?;

        if is_directory {
            let has_children = tree.get(&path).is_some_and(|c| !c.is_empty());
            if has_children && !req.is_recursive {
                return Ok(DeleteEntryResponse {
                    error: format!("fail to delete non-empty folder: {}", path),
                });
            }
            for key in subtree_keys(&tree, &path) {
                tree.remove(&key);
            }
        }

        if let Some(children) = tree.get_mut(&req.directory) {
            children.remove(&req.name);
        }
        debug!("memory filer: deleted {}", path);
        Ok(DeleteEntryResponse::default())
    }

    async fn update_entry(&self, req: UpdateEntryRequest) -> RpcResult<UpdateEntryResponse> {
        let mut tree = self.write()?;
        let path = full_path(&req.directory, &req.entry.name);
        let slot = tree
            .get_mut(&req.directory)
            .and_then(|children| children.get_mut(&req.entry.name))
            .ok_or(RpcError::NotFound(path))?;

        if slot.is_directory != req.entry.is_directory {
            return Ok(UpdateEntryResponse {
                error: "cannot change entry type".to_string(),
            });
        }
        *slot = req.entry;
        Ok(UpdateEntryResponse::default())
    }

    async fn atomic_rename_entry(
        &self,
        req: AtomicRenameEntryRequest,
    ) -> RpcResult<AtomicRenameEntryResponse> {
        let mut tree = self.write()?;
        let old_path = full_path(&req.old_directory, &req.old_name);
        let new_path = full_path(&req.new_directory, &req.new_name);

        if !tree.contains_key(&req.new_directory) {
            return Err(RpcError::NotFound(req.new_directory));
        }
        if tree
            .get(&req.new_directory)
            .is_some_and(|children| children.contains_key(&req.new_name))
        {
            return Ok(AtomicRenameEntryResponse {
                error: format!("destination {} already exists", new_path),
            });
        }
        if new_path.starts_with(&format!("{}/", old_path)) {
            return Ok(AtomicRenameEntryResponse {
                error: format!("cannot move {} into itself", old_path),
            });
        }

        let mut entry = tree
            .get_mut(&req.old_directory)
            .and_then(|children| children.remove(&req.old_name))
            .ok_or_else(|| RpcError::NotFound(old_path.clone()))?;

        if entry.is_directory {
            for key in subtree_keys(&tree, &old_path) {
                if let Some(children) = tree.remove(&key) {
                    let moved = format!("{}{}", new_path, &key[old_path.len()..]);
                    tree.insert(moved, children);
                }
            }
        }

        entry.name = req.new_name.clone();
        if let Some(children) = tree.get_mut(&req.new_directory) {
            children.insert(req.new_name, entry);
        }
        debug!("memory filer: renamed {} -> {}", old_path, new_path);
        Ok(AtomicRenameEntryResponse::default())
    }
}
