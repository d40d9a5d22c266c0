use crate::areas::repository::Repository;
use crate::artifacts::dump::ref_lister::list_dump_refs;
use crate::artifacts::dump::{DumpContext, DumpOptions};
use crate::artifacts::log::rev_list::RevList;

impl Repository {
    /// Write the dump of everything reachable from HEAD to the repository
    /// writer: reference lines first, then each commit with its changes,
    /// trees and blobs.
    pub fn dump(&self, options: &DumpOptions) -> anyhow::Result<()> {
        if options.include_refs {
            for dump_ref in list_dump_refs(self.refs())? {
                writeln!(
                    self.writer(),
                    "{}",
                    dump_ref.to_line(&options.repo_placeholder, &options.date_placeholder)
                )?;
            }
        }

        let head = self.refs().read_head()?;
        if head.is_none() {
            tracing::info!("HEAD does not point to a commit yet, nothing to dump");
        }

        let mut context = DumpContext::new(self.database(), options);
        let commits = RevList::new(self.database(), head, options.order, options.since);

        for item in commits.into_iter()? {
            let (oid, commit) = item?;
            let lines = context.render_commit(&oid, &commit)?;

            let mut writer = self.writer();
            for line in lines {
                writeln!(writer, "{line}")?;
            }
        }

        self.writer().flush()?;

        let stats = context.ledger().stats();
        tracing::debug!(
            commits = stats.commits,
            trees = stats.trees,
            blobs = stats.blobs,
            "dump finished"
        );

        Ok(())
    }
}
