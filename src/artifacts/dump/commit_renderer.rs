use crate::artifacts::dump::DumpContext;
use crate::artifacts::dump::json::to_json_string;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;

impl DumpContext<'_> {
    /// Every line for one commit, or nothing if it was already written.
    ///
    /// Metadata comes first, then change lines (not for merges), then the
    /// lines of the root tree and the blobs it brings in. Only that last
    /// group is sorted when `sort_objects` is set.
    pub fn render_commit(&mut self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<Vec<String>> {
        if !self.ledger.mark_commit(oid) {
            return Ok(Vec::new());
        }

        let mut lines = vec![
            Self::signature_line(oid, "author", commit.author()),
            Self::signature_line(oid, "committer", commit.committer()),
            format!(
                "commit {oid} message {}",
                to_json_string(commit.message().trim(), self.options.ascii_only)?
            ),
            format!(
                "commit {oid} parents{}",
                commit
                    .parents()
                    .iter()
                    .map(|parent| format!(" {parent}"))
                    .collect::<String>()
            ),
            format!("commit {oid} tree {}", commit.tree_oid()),
        ];

        if commit.is_merge() {
            tracing::warn!("Skipping diff view (file* items) for merge commit {oid}");
        } else {
            self.classify_changes(oid, commit, &mut lines)?;
        }

        let mut objects = Vec::new();
        self.walk_tree(commit.tree_oid(), &mut objects)?;
        // content whose tree was already written through another commit
        for blob in self.ledger.due_blobs() {
            self.emit_blob(&blob, &mut objects)?;
        }

        if self.options.sort_objects {
            objects.sort();
        }
        lines.append(&mut objects);

        Ok(lines)
    }

    fn signature_line(oid: &ObjectId, role: &str, signature: &Author) -> String {
        format!(
            "commit {oid} {role} \"{}\" {}",
            signature.display_name(),
            signature.iso_timestamp()
        )
    }
}
