//! Git tree object
//!
//! Trees represent directory snapshots in Git. They contain entries for files (blobs),
//! subdirectories (other trees) and submodules (gitlinks), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are kept in the order they appear in the object. Git writes them
//! sorted by name with directories compared as if they ended in `/`.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::entry_mode::EntryMode;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

pub type TreeEntry = (String, DatabaseEntry);

#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from loose entries, ordering them the way git does.
    #[cfg(test)]
    pub fn build(entries: impl IntoIterator<Item = TreeEntry>) -> Self {
        let mut entries = entries.into_iter().collect::<Vec<_>>();
        entries.sort_by(|(a_name, a), (b_name, b)| {
            Self::sort_key(a_name, a).cmp(&Self::sort_key(b_name, b))
        });

        Tree { entries }
    }

    #[cfg(test)]
    fn sort_key(name: &str, entry: &DatabaseEntry) -> Vec<u8> {
        let mut key = name.as_bytes().to_vec();
        if entry.is_tree() {
            key.push(b'/');
        }
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> std::vec::IntoIter<TreeEntry> {
        self.entries.into_iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();

        for (name, entry) in &self.entries {
            write!(content_bytes, "{:o} {}", entry.mode.as_u32(), name)?;
            content_bytes.push(0);
            entry.oid.write_h40_to(&mut content_bytes)?;
        }

        Ok(with_header(self.object_type(), &content_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = Vec::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(anyhow::anyhow!("unexpected EOF in mode"));
            }

            let mode_str = std::str::from_utf8(&mode_bytes)?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(anyhow::anyhow!("unexpected EOF in name"));
            }
            let name = std::str::from_utf8(&name_bytes)
                .context("tree entry name is not valid UTF-8")?
                .to_owned();

            let oid =
                ObjectId::read_h40_from(&mut reader).context("unexpected EOF in object id")?;

            entries.push((name, DatabaseEntry::new(oid, mode)));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
