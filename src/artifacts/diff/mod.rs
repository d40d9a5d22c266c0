//! Tree comparison and change classification
//!
//! - `tree_diff`: recursive two-tree comparison producing added/deleted/modified files
//! - `rename_detector`: pairs deletions with additions of identical or similar content
//!
//! Only the set of changed paths is computed, never line-level hunks.

pub mod rename_detector;
pub mod tree_diff;

use crate::artifacts::database::database_entry::DatabaseEntry;
use derive_new::new;

/// One side of a change: a path and the entry found there
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DiffFile {
    pub path: String,
    pub entry: DatabaseEntry,
}

/// A single file-level change between two trees
///
/// Mirrors git's name-status letters. `Copied` and `TypeChanged` exist so
/// that every status git can report has a representation, even though the
/// comparison in this crate never produces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChange {
    Added(DiffFile),
    Deleted(DiffFile),
    Modified {
        old: DiffFile,
        new: DiffFile,
    },
    Renamed {
        old: DiffFile,
        new: DiffFile,
        similarity: u8,
    },
    Copied {
        old: DiffFile,
        new: DiffFile,
        similarity: u8,
    },
    TypeChanged {
        old: DiffFile,
        new: DiffFile,
    },
}

impl TreeChange {
    /// Classify the entries found at `path` on both sides.
    ///
    /// An entry whose mode type changes (file to symlink, symlink to
    /// submodule, ...) is reported as a deletion followed by an addition;
    /// a regular file turning executable stays a modification.
    pub fn from_entries(
        path: &str,
        old: Option<DatabaseEntry>,
        new: Option<DatabaseEntry>,
    ) -> Vec<Self> {
        let file = |entry| DiffFile::new(path.to_string(), entry);

        match (old, new) {
            (None, Some(new)) => vec![TreeChange::Added(file(new))],
            (Some(old), None) => vec![TreeChange::Deleted(file(old))],
            (Some(old), Some(new)) if old.mode.mode_type() != new.mode.mode_type() => vec![
                TreeChange::Deleted(file(old)),
                TreeChange::Added(file(new)),
            ],
            (Some(old), Some(new)) if old != new => vec![TreeChange::Modified {
                old: file(old),
                new: file(new),
            }],
            _ => Vec::new(), // No change or both are None
        }
    }

    pub fn old_file(&self) -> Option<&DiffFile> {
        match self {
            TreeChange::Added(_) => None,
            TreeChange::Deleted(old)
            | TreeChange::Modified { old, .. }
            | TreeChange::Renamed { old, .. }
            | TreeChange::Copied { old, .. }
            | TreeChange::TypeChanged { old, .. } => Some(old),
        }
    }

    pub fn new_file(&self) -> Option<&DiffFile> {
        match self {
            TreeChange::Deleted(_) => None,
            TreeChange::Added(new)
            | TreeChange::Modified { new, .. }
            | TreeChange::Renamed { new, .. }
            | TreeChange::Copied { new, .. }
            | TreeChange::TypeChanged { new, .. } => Some(new),
        }
    }

    /// The path the change is listed under: the new path when there is one
    pub fn path(&self) -> &str {
        self.new_file()
            .or_else(|| self.old_file())
            .map(|file| file.path.as_str())
            .unwrap_or_default()
    }

    pub fn status_char(&self) -> char {
        match self {
            TreeChange::Added(_) => 'A',
            TreeChange::Deleted(_) => 'D',
            TreeChange::Modified { .. } => 'M',
            TreeChange::Renamed { .. } => 'R',
            TreeChange::Copied { .. } => 'C',
            TreeChange::TypeChanged { .. } => 'T',
        }
    }
}
