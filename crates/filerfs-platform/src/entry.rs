use serde::{Deserialize, Serialize};

/// Attribute record the filer keeps for every entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuseAttributes {
    /// Size in bytes
    #[serde(default)]
    pub file_size: u64,
    /// Modification time, seconds since epoch
    #[serde(default)]
    pub mtime: i64,
    /// Creation time, seconds since epoch
    #[serde(default)]
    pub crtime: i64,
    /// Permission bits; only the low 16 bits are meaningful
    #[serde(default)]
    pub file_mode: u32,
    #[serde(default)]
    pub uid: u32,
    #[serde(default)]
    pub gid: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime: String,
    #[serde(default)]
    pub user_name: String,
    /// Group names, primary group first
    #[serde(default)]
    pub group_name: Vec<String>,
}

/// One filesystem object as stored by the filer, addressed by its parent
/// directory plus `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub attributes: FuseAttributes,
}

impl Entry {
    pub fn directory(name: impl Into<String>, attributes: FuseAttributes) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            attributes,
        }
    }

    pub fn file(name: impl Into<String>, attributes: FuseAttributes) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            attributes,
        }
    }
}
