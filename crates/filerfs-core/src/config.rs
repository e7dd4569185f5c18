use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page cap for one listing request
pub const DEFAULT_LIST_LIMIT: u32 = 100_000;

/// How directory listings are fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// One request; directories larger than the limit come back truncated
    #[default]
    SinglePage,
    /// Keep requesting pages after the last returned name until one comes back short
    Paginated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Entries requested per listing page
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,

    #[serde(default)]
    pub listing: ListingMode,
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
            listing: ListingMode::default(),
        }
    }
}

impl StoreConfig {
    /// Per-user location of `store.json`, falling back to the working directory
    /// when the platform reports no home
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("io", "filerfs", "filerfs")
            .map(|dirs| dirs.config_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("filerfs-store.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid store config in {}", path.display()))
    }

    /// Read `path` (or `default_path()` when `None`); a missing file yields the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            debug!("no store config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create config dir {}", dir.display()))?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write config to {}", path.display()))
    }

    /// Page size actually sent to the filer; a zero limit would never make progress
    pub fn page_size(&self) -> u32 {
        self.list_limit.max(1)
    }
}
