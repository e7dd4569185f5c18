use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

const SEPARATOR: char = '/';

/// Normalized absolute path in the filer namespace.
///
/// Always starts with `/`, never ends with one (except the root itself), and
/// holds no empty, `.` or `..` components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilerPath(String);

impl FilerPath {
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    pub fn parse(path: &str) -> StoreResult<Self> {
        if !path.starts_with(SEPARATOR) {
            return Err(StoreError::invalid_path(format!("{} is not absolute", path)));
        }

        let mut components = Vec::new();
        for component in path.split(SEPARATOR) {
            match component {
                "" | "." => continue,
                ".." => {
                    return Err(StoreError::invalid_path(format!(
                        "{} contains a parent reference",
                        path
                    )))
                }
                c => components.push(c),
            }
        }

        if components.is_empty() {
            Ok(Self::root())
        } else {
            Ok(Self(format!("/{}", components.join("/"))))
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// `None` for the root
    pub fn parent(&self) -> Option<FilerPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Final component; empty for the root
    pub fn name(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    pub fn child(&self, name: &str) -> StoreResult<FilerPath> {
        if name.is_empty() || name == "." || name == ".." || name.contains(SEPARATOR) {
            return Err(StoreError::invalid_path(format!(
                "{:?} is not a valid name under {}",
                name, self
            )));
        }
        if self.is_root() {
            Ok(Self(format!("/{}", name)))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Split `path` into the (parent directory, leaf name) pair the filer
/// addresses entries by. The root has no parent and is rejected.
pub fn resolve(path: &FilerPath) -> StoreResult<(FilerPath, &str)> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::invalid_path(format!("{} has no parent directory", path)))?;
    Ok((parent, path.name()))
}

impl fmt::Display for FilerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FilerPath {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FilerPath {
    type Error = StoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FilerPath> for String {
    fn from(p: FilerPath) -> Self {
        p.0
    }
}

impl AsRef<str> for FilerPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
