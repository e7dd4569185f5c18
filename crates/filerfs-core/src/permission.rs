use std::fmt;

use serde::{Deserialize, Serialize};

const STICKY_BIT: u16 = 0o1000;

/// Immutable 16-bit permission value, stored on the filer as `file_mode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FsPermission(u16);

impl FsPermission {
    pub const fn from_short(mode: u16) -> Self {
        Self(mode)
    }

    pub const fn to_short(self) -> u16 {
        self.0
    }

    /// Rebuild from the filer's mode field. Only the low 16 bits carry
    /// permission data.
    pub const fn from_mode(mode: u32) -> Self {
        Self((mode & 0xffff) as u16)
    }

    /// Clear the bits set in `umask`. Never applied implicitly by the store.
    pub const fn apply_umask(self, umask: FsPermission) -> Self {
        Self(self.0 & !umask.0)
    }

    pub const fn sticky_bit(self) -> bool {
        self.0 & STICKY_BIT != 0
    }
}

impl fmt::Display for FsPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(9);
        for shift in [6u16, 3, 0] {
            let bits = (self.0 >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            let exec = bits & 0o1 != 0;
            out.push(match (shift, exec, self.sticky_bit()) {
                (0, true, true) => 't',
                (0, false, true) => 'T',
                (_, true, _) => 'x',
                _ => '-',
            });
        }
        f.write_str(&out)
    }
}
