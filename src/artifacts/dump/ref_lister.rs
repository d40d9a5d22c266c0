use crate::areas::refs::{Refs, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Lower-case branch and tag names directly below `refs/heads` and `refs/tags`
const DUMP_REF_REGEX: &str = r"^refs/(head|tag)s/([a-z0-9\-\.]+)$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Branch,
    Tag,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Branch => "branch",
            RefKind::Tag => "tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DumpRef {
    pub name: String,
    pub kind: RefKind,
    pub target: ObjectId,
}

impl DumpRef {
    pub fn to_line(&self, repo_placeholder: &str, date_placeholder: &str) -> String {
        format!(
            "ref {} {} {} {repo_placeholder} {date_placeholder}",
            self.target,
            self.kind.as_str(),
            self.name
        )
    }
}

/// Branches and tags worth dumping, ordered by full ref name. Anything else
/// (remotes, nested or upper-case names) is left out.
pub fn list_dump_refs(refs: &Refs) -> anyhow::Result<Vec<DumpRef>> {
    let pattern = regex::Regex::new(DUMP_REF_REGEX)?;

    Ok(refs
        .list_all_refs()?
        .into_iter()
        .filter_map(|(sym_ref, target)| {
            let dump_ref = parse_ref_name(&pattern, &sym_ref, target);
            if dump_ref.is_none() {
                tracing::trace!(%sym_ref, "ref name not dumped");
            }
            dump_ref
        })
        .collect())
}

fn parse_ref_name(
    pattern: &regex::Regex,
    sym_ref: &SymRefName,
    target: ObjectId,
) -> Option<DumpRef> {
    let captures = pattern.captures(sym_ref.as_ref())?;
    let kind = match &captures[1] {
        "head" => RefKind::Branch,
        _ => RefKind::Tag,
    };

    Some(DumpRef::new(captures[2].to_string(), kind, target))
}
