use crate::artifacts::objects::object_id::ObjectId;
use std::collections::HashSet;

/// Ids written so far in one dump, plus blobs waiting to be written
#[derive(Debug, Default)]
pub struct DumpLedger {
    commits: HashSet<ObjectId>,
    trees: HashSet<ObjectId>,
    blobs: HashSet<ObjectId>,
    pending_blobs: HashSet<ObjectId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub commits: usize,
    pub trees: usize,
    pub blobs: usize,
    pub pending_blobs: usize,
}

impl DumpLedger {
    /// Record a commit, returning false if it was already recorded.
    pub fn mark_commit(&mut self, oid: &ObjectId) -> bool {
        self.commits.insert(oid.clone())
    }

    /// Record a tree, returning false if it was already recorded.
    pub fn mark_tree(&mut self, oid: &ObjectId) -> bool {
        self.trees.insert(oid.clone())
    }

    pub fn queue_blob(&mut self, oid: &ObjectId) {
        self.pending_blobs.insert(oid.clone());
    }

    /// A blob is due when a change line asked for it and it was not written yet.
    pub fn is_blob_due(&self, oid: &ObjectId) -> bool {
        self.pending_blobs.contains(oid) && !self.blobs.contains(oid)
    }

    pub fn mark_blob(&mut self, oid: &ObjectId) {
        self.pending_blobs.remove(oid);
        self.blobs.insert(oid.clone());
    }

    /// Blobs still due, in id order
    pub fn due_blobs(&self) -> Vec<ObjectId> {
        let mut due = self
            .pending_blobs
            .iter()
            .filter(|oid| !self.blobs.contains(*oid))
            .cloned()
            .collect::<Vec<_>>();
        due.sort();

        due
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            commits: self.commits.len(),
            trees: self.trees.len(),
            blobs: self.blobs.len(),
            pending_blobs: self.pending_blobs.len(),
        }
    }
}
