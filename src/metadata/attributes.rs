//! File Attributes Module
//!
//! The normalized, stat-like record handed back to the filesystem layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Mode Bits ==
pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = 0o120000;

/// Preferred I/O block size reported for every object.
pub const BLOCK_SIZE: u32 = 4096;

const SECTOR_SIZE: u64 = 512;

// == File Type ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Regular,
    Directory,
    Symlink,
}

impl FileType {
    /// Decodes the type bits of a full `st_mode` value.
    ///
    /// Returns None when the mode carries no (or an unsupported) type.
    pub fn from_mode(mode: u32) -> Option<Self> {
        match mode & S_IFMT {
            S_IFREG => Some(FileType::Regular),
            S_IFDIR => Some(FileType::Directory),
            S_IFLNK => Some(FileType::Symlink),
            _ => None,
        }
    }

    pub fn type_bits(self) -> u32 {
        match self {
            FileType::Regular => S_IFREG,
            FileType::Directory => S_IFDIR,
            FileType::Symlink => S_IFLNK,
        }
    }
}

// == File Attributes ==
/// Normalized attributes of one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    pub file_type: FileType,
    /// Permission bits only (the low 12 bits of `st_mode`)
    pub permissions: u32,
    pub size: u64,
    /// Number of 512-byte sectors, non-zero only for regular files
    pub blocks: u64,
    pub block_size: u32,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    pub mtime: DateTime<Utc>,
}

impl FileAttributes {
    /// Full `st_mode`: type bits combined with permissions.
    pub fn mode(&self) -> u32 {
        self.file_type.type_bits() | self.permissions
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    // == Size Updates ==
    /// Sets the size and recomputes the derived block count.
    pub fn set_size(&mut self, size: u64) {
        self.size = size;
        self.blocks = blocks_for(self.file_type, size);
    }

    /// Applies a signed size delta, saturating at both ends of `u64`.
    pub fn adjust_size(&mut self, delta: i64) {
        let size = if delta >= 0 {
            self.size.saturating_add(delta.unsigned_abs())
        } else {
            self.size.saturating_sub(delta.unsigned_abs())
        };
        self.set_size(size);
    }
}

/// Sector count for a file of `size` bytes.
pub(crate) fn blocks_for(file_type: FileType, size: u64) -> u64 {
    match file_type {
        FileType::Regular => size.div_ceil(SECTOR_SIZE),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(size: u64) -> FileAttributes {
        FileAttributes {
            file_type: FileType::Regular,
            permissions: 0o644,
            size,
            blocks: blocks_for(FileType::Regular, size),
            block_size: BLOCK_SIZE,
            nlink: 1,
            uid: 0,
            gid: 0,
            mtime: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn test_file_type_from_mode() {
        assert_eq!(FileType::from_mode(0o100644), Some(FileType::Regular));
        assert_eq!(FileType::from_mode(0o040755), Some(FileType::Directory));
        assert_eq!(FileType::from_mode(0o120777), Some(FileType::Symlink));
        assert_eq!(FileType::from_mode(0o644), None);
    }

    #[test]
    fn test_mode_combines_type_and_permissions() {
        let attrs = regular(0);
        assert_eq!(attrs.mode(), 0o100644);
    }

    #[test]
    fn test_blocks_round_up() {
        assert_eq!(regular(0).blocks, 0);
        assert_eq!(regular(1).blocks, 1);
        assert_eq!(regular(512).blocks, 1);
        assert_eq!(regular(513).blocks, 2);
    }

    #[test]
    fn test_adjust_size_grow_and_shrink() {
        let mut attrs = regular(100);
        attrs.adjust_size(924);
        assert_eq!(attrs.size, 1024);
        assert_eq!(attrs.blocks, 2);

        attrs.adjust_size(-1000);
        assert_eq!(attrs.size, 24);
        assert_eq!(attrs.blocks, 1);
    }

    #[test]
    fn test_adjust_size_saturates_at_zero() {
        let mut attrs = regular(10);
        attrs.adjust_size(-50);
        assert_eq!(attrs.size, 0);
        assert_eq!(attrs.blocks, 0);
    }

    #[test]
    fn test_directory_has_no_blocks() {
        assert_eq!(blocks_for(FileType::Directory, 4096), 0);
    }
}
