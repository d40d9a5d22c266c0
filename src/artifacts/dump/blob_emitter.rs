use crate::artifacts::dump::json::to_json_string;
use crate::artifacts::dump::{DumpContext, DumpError};
use crate::artifacts::objects::object_id::ObjectId;

impl DumpContext<'_> {
    /// Push `blob <id> <json>` if the blob is due, and record it as written.
    pub fn emit_blob(&mut self, oid: &ObjectId, lines: &mut Vec<String>) -> anyhow::Result<()> {
        if !self.ledger.is_blob_due(oid) {
            return Ok(());
        }

        let blob = self.database.load_blob(oid)?;
        let text = blob.text().map_err(|source| DumpError::BinaryBlob {
            oid: oid.clone(),
            source,
        })?;

        lines.push(format!(
            "blob {oid} {}",
            to_json_string(text, self.options.ascii_only)?
        ));
        self.ledger.mark_blob(oid);

        Ok(())
    }
}
