use crate::artifacts::diff::TreeChange;
use crate::artifacts::diff::rename_detector::RenameDetector;
use crate::artifacts::dump::{DumpContext, DumpError};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::database::database_entry::DatabaseEntry;

impl DumpContext<'_> {
    /// Push one `file*` line per change between the first parent's tree (the
    /// empty tree for a root commit) and the commit's tree.
    pub fn classify_changes(
        &mut self,
        commit_oid: &ObjectId,
        commit: &Commit,
        lines: &mut Vec<String>,
    ) -> anyhow::Result<()> {
        let old_tree = match commit.parent() {
            Some(parent) => Some(self.database.load_commit(parent)?.tree_oid().clone()),
            None => None,
        };

        let changes = self
            .database
            .tree_diff(old_tree.as_ref(), Some(commit.tree_oid()))?
            .into_changes();
        let changes =
            RenameDetector::new(self.database, self.options.rename_threshold).detect(changes)?;

        for change in changes {
            lines.push(self.change_line(commit_oid, change)?);
        }

        Ok(())
    }

    pub(crate) fn change_line(
        &mut self,
        commit_oid: &ObjectId,
        change: TreeChange,
    ) -> anyhow::Result<String> {
        let line = match change {
            TreeChange::Added(new) => {
                self.queue_content(&new.entry);
                format!("commit {commit_oid} filecreate {} {}", new.path, new.entry.oid)
            }
            TreeChange::Deleted(old) => format!("commit {commit_oid} fileremove {}", old.path),
            TreeChange::Modified { new, .. } => {
                self.queue_content(&new.entry);
                format!("commit {commit_oid} filemodify {} {}", new.path, new.entry.oid)
            }
            TreeChange::Renamed { old, new, .. } => {
                if old.entry.oid != new.entry.oid {
                    self.queue_content(&new.entry);
                }
                format!(
                    "commit {commit_oid} filerename {} {} {}",
                    old.path, new.path, new.entry.oid
                )
            }
            other => {
                return Err(DumpError::UnsupportedChangeStatus {
                    commit: commit_oid.clone(),
                    path: other.path().to_string(),
                    status: other.status_char(),
                }
                .into());
            }
        };

        Ok(line)
    }

    // submodule commits live in another repository
    fn queue_content(&mut self, entry: &DatabaseEntry) {
        if entry.mode.object_type() == ObjectType::Blob {
            self.ledger.queue_blob(&entry.oid);
        }
    }
}
