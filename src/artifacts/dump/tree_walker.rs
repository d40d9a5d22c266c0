use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::dump::{DumpContext, TreeLineFormat};
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;

/// A tree being walked and the entries still to visit
type Frame = (ObjectId, std::vec::IntoIter<TreeEntry>);

impl DumpContext<'_> {
    /// Write `root` and every tree below it that was not written yet.
    ///
    /// Depth first in entry order: each entry line is directly followed by
    /// the lines of the sub-tree it points to. Blob entries are passed to the
    /// blob emitter, submodule entries are listed but not followed.
    pub fn walk_tree(&mut self, root: &ObjectId, lines: &mut Vec<String>) -> anyhow::Result<()> {
        let mut stack = Vec::new();
        stack.extend(self.enter_tree(root, lines)?);

        while let Some((tree_oid, entries)) = stack.last_mut() {
            let Some((name, entry)) = entries.next() else {
                stack.pop();
                continue;
            };

            lines.push(self.entry_line(tree_oid, &name, &entry));

            match entry.mode {
                EntryMode::Directory => stack.extend(self.enter_tree(&entry.oid, lines)?),
                EntryMode::File(_) => self.emit_blob(&entry.oid, lines)?,
                EntryMode::Gitlink => {}
            }
        }

        Ok(())
    }

    fn enter_tree(
        &mut self,
        oid: &ObjectId,
        lines: &mut Vec<String>,
    ) -> anyhow::Result<Option<Frame>> {
        if !self.ledger.mark_tree(oid) {
            return Ok(None);
        }

        let tree = self.database.load_tree(oid)?;
        lines.push(format!("tree {oid} {}", tree.len()));

        Ok(Some((oid.clone(), tree.into_entries())))
    }

    fn entry_line(&self, tree_oid: &ObjectId, name: &str, entry: &DatabaseEntry) -> String {
        let kind = entry.mode.object_type();

        match self.options.tree_line_format {
            TreeLineFormat::Detailed => format!(
                "tree {tree_oid} {kind} {} {name} {}",
                entry.oid,
                entry.mode.to_octal_string()
            ),
            TreeLineFormat::Minimal => format!("tree {tree_oid} {kind} {}", entry.oid),
        }
    }
}
