use crate::areas::database::Database;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::TreeChange;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

/// Changes keyed by full `/`-separated path, so iteration is in path byte order.
/// A path holds two changes when its entry changed type.
pub type ChangeSet = BTreeMap<String, Vec<TreeChange>>;
pub type TreeEntryMap = BTreeMap<String, DatabaseEntry>;

/// Recursive comparison of an old and a new tree
///
/// Sub-trees present on either side are descended into; only non-tree
/// entries (files, symlinks, submodules) end up in the change set. A path
/// that switches between file and directory shows up as a deletion plus
/// additions below it; one that switches between file, symlink and
/// submodule shows up as a deletion plus an addition at the same path.
#[derive(Debug)]
pub struct TreeDiff<'r> {
    database: &'r Database,
    change_set: ChangeSet,
}

impl<'r> TreeDiff<'r> {
    pub fn new(database: &'r Database) -> Self {
        TreeDiff {
            database,
            change_set: BTreeMap::new(),
        }
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.change_set
    }

    pub fn into_changes(self) -> Vec<TreeChange> {
        self.change_set.into_values().flatten().collect()
    }

    pub fn compare_oids(
        &mut self,
        old: Option<&ObjectId>,
        new: Option<&ObjectId>,
        prefix: &str,
    ) -> anyhow::Result<()> {
        if old == new {
            return Ok(());
        }

        let old_tree_entries = self.inflate_oid_to_tree_entries(old)?;
        let new_tree_entries = self.inflate_oid_to_tree_entries(new)?;

        self.detect_deletions(&old_tree_entries, &new_tree_entries, prefix)?;
        self.detect_additions(&old_tree_entries, &new_tree_entries, prefix)?;

        Ok(())
    }

    fn inflate_oid_to_tree_entries(&self, oid: Option<&ObjectId>) -> anyhow::Result<TreeEntryMap> {
        match oid {
            None => Ok(BTreeMap::new()),
            Some(oid) => Ok(self
                .database
                .load_tree(oid)?
                .into_entries()
                .collect::<BTreeMap<_, _>>()),
        }
    }

    fn join(prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        }
    }

    fn detect_deletions(
        &mut self,
        old: &TreeEntryMap,
        new: &TreeEntryMap,
        prefix: &str,
    ) -> anyhow::Result<()> {
        for (name, entry) in old {
            let path = Self::join(prefix, name);
            let other = new.get(name);

            if let Some(other) = other
                && other == entry
            {
                continue;
            }

            let tree_a_oid = if entry.is_tree() {
                Some(&entry.oid)
            } else {
                None
            };
            let tree_b_oid = if let Some(other) = other
                && other.is_tree()
            {
                Some(&other.oid)
            } else {
                None
            };

            self.compare_oids(tree_a_oid, tree_b_oid, &path)?;

            let blob_a = if entry.is_tree() {
                None
            } else {
                Some(entry.clone())
            };
            let blob_b = match other {
                Some(other) if !other.is_tree() => Some(other.clone()),
                _ => None,
            };

            let changes = TreeChange::from_entries(&path, blob_a, blob_b);
            if !changes.is_empty() {
                self.change_set.insert(path, changes);
            }
        }

        Ok(())
    }

    fn detect_additions(
        &mut self,
        old: &TreeEntryMap,
        new: &TreeEntryMap,
        prefix: &str,
    ) -> anyhow::Result<()> {
        for (name, entry) in new {
            if old.contains_key(name) {
                continue;
            }

            let path = Self::join(prefix, name);

            if entry.is_tree() {
                self.compare_oids(None, Some(&entry.oid), &path)?;
            } else {
                let changes = TreeChange::from_entries(&path, None, Some(entry.clone()));
                self.change_set.insert(path, changes);
            }
        }

        Ok(())
    }
}
