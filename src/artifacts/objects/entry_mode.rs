//! Tree entry modes
//!
//! Git records one of a handful of octal modes for every tree entry. The mode
//! also decides what kind of object the entry points at.

use crate::artifacts::objects::object_type::ObjectType;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Symlink,
}

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    #[default]
    Directory,
    /// Submodule commit
    Gitlink,
}

impl EntryMode {
    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::File(FileMode::Symlink) => 0o120000,
            EntryMode::Directory => 0o40000,
            EntryMode::Gitlink => 0o160000,
        }
    }

    /// Six digit, zero padded octal form (`040000`, `100644`, ...)
    pub fn to_octal_string(&self) -> String {
        format!("{:06o}", self.as_u32())
    }

    /// The object-type bits of the mode (`S_IFMT`): regular and executable
    /// files share one, symlinks, directories and submodules each have their own.
    pub fn mode_type(&self) -> u32 {
        self.as_u32() & 0o170000
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn is_gitlink(&self) -> bool {
        matches!(self, EntryMode::Gitlink)
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::File(_) => ObjectType::Blob,
            EntryMode::Directory => ObjectType::Tree,
            EntryMode::Gitlink => ObjectType::Commit,
        }
    }

    /// Parse the octal mode as written inside tree objects (no zero padding).
    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| anyhow::anyhow!("Invalid entry mode '{mode}'"))?;

        Self::try_from(mode)
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(mode: u32) -> anyhow::Result<Self> {
        match mode {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            // pre-2005 git wrote group-writable blobs
            0o100664 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::File(FileMode::Symlink)),
            0o40000 => Ok(EntryMode::Directory),
            0o160000 => Ok(EntryMode::Gitlink),
            _ => Err(anyhow::anyhow!("Invalid entry mode {mode:o}")),
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}
