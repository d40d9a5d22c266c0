//! Git references (branches, HEAD, tags)
//!
//! This module reads Git references, human-readable names pointing to objects.
//! References can be:
//! - Direct: Containing an object SHA-1
//! - Symbolic: Pointing to another reference (e.g., HEAD -> refs/heads/master)
//!
//! ## Storage
//!
//! - Loose refs: one file per ref under `.git/refs/...`, holding either a
//!   40-character SHA-1 or `ref: <name>` for symbolic references
//! - Packed refs: `.git/packed-refs`, one `<sha> <name>` per line, with `^<sha>`
//!   peel lines after annotated tags. A loose ref shadows a packed one.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Symbolic refs can point at each other; git gives up after this many hops
const MAX_SYMREF_DEPTH: usize = 5;

/// Full name of a reference, relative to the git directory (`refs/heads/main`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SymRefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymRefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Internal representation of a reference value
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;

        Self::parse(content.trim())
    }

    fn parse(content: &str) -> anyhow::Result<Option<SymRefOrOid>> {
        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

/// Git references reader
#[derive(Debug)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
    /// Where HEAD lives; differs from `path` only in linked worktrees
    head_dir: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs {
            head_dir: path.clone(),
            path,
        }
    }

    pub fn with_head_dir(path: Box<Path>, head_dir: Box<Path>) -> Self {
        Refs { path, head_dir }
    }

    /// Resolve HEAD to a commit id
    ///
    /// Returns `None` for an unborn branch (a fresh repository without commits).
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_oid(&SymRefName::new(HEAD_REF_NAME.to_string()))
    }

    /// Follow a reference, through symbolic indirection, to the object it names
    pub fn read_oid(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        let packed_refs = self.read_packed_refs()?;
        self.resolve(sym_ref_name, &packed_refs, 0)
    }

    fn resolve(
        &self,
        sym_ref_name: &SymRefName,
        packed_refs: &BTreeMap<SymRefName, ObjectId>,
        depth: usize,
    ) -> anyhow::Result<Option<ObjectId>> {
        if depth > MAX_SYMREF_DEPTH {
            anyhow::bail!("too many levels of symbolic refs at {}", sym_ref_name);
        }

        let dir = if sym_ref_name.as_ref_path() == HEAD_REF_NAME {
            &self.head_dir
        } else {
            &self.path
        };
        let path = dir.join(sym_ref_name.as_ref_path());

        match SymRefOrOid::read_symref_or_oid(&path)? {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.resolve(&sym_ref_name, packed_refs, depth + 1)
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(packed_refs.get(sym_ref_name).cloned()),
        }
    }

    /// Every reference under `refs/`, loose and packed, sorted by name.
    ///
    /// Symbolic refs below `refs/` (e.g. `refs/remotes/origin/HEAD`) resolve to
    /// their target; dangling ones are left out.
    pub fn list_all_refs(&self) -> anyhow::Result<BTreeMap<SymRefName, ObjectId>> {
        let mut refs = self.read_packed_refs()?;

        for sym_ref in self.list_loose_refs(self.refs_path().as_ref())? {
            match self.resolve(&sym_ref, &refs, 0) {
                Ok(Some(oid)) => {
                    refs.insert(sym_ref, oid);
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::debug!(%sym_ref, "skipping unreadable ref: {error:#}");
                }
            }
        }

        Ok(refs)
    }

    fn list_loose_refs(&self, path: &Path) -> anyhow::Result<Vec<SymRefName>> {
        Ok(WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                    let name = relative_path
                        .components()
                        .map(|component| component.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    Some(SymRefName::new(name))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>())
    }

    fn read_packed_refs(&self) -> anyhow::Result<BTreeMap<SymRefName, ObjectId>> {
        let path = self.packed_refs_path();
        if !path.is_file() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read packed refs at {:?}", path))?;

        content
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('^'))
            .map(|line| {
                let (oid, name) = line
                    .split_once(' ')
                    .with_context(|| format!("malformed packed-refs line '{line}'"))?;
                Ok((
                    SymRefName::new(name.to_string()),
                    ObjectId::try_parse(oid.to_string())?,
                ))
            })
            .collect()
    }

    /// Write `raw_ref` (an oid or `ref: <name>`) to the ref file at `path`.
    #[cfg(test)]
    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        std::fs::write(&path, format!("{raw_ref}\n"))
            .with_context(|| format!("failed to write ref file at {:?}", path))
    }

    #[cfg(test)]
    pub fn update_ref(&self, sym_ref_name: &SymRefName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(
            self.path.join(sym_ref_name.as_ref_path()).into_boxed_path(),
            oid.to_string(),
        )
    }

    /// Point HEAD at `sym_ref_name` symbolically.
    #[cfg(test)]
    pub fn set_head(&self, sym_ref_name: &SymRefName) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), format!("ref: {sym_ref_name}"))
    }

    #[cfg(test)]
    pub fn head_path(&self) -> Box<Path> {
        self.head_dir.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn packed_refs_path(&self) -> Box<Path> {
        self.path.join("packed-refs").into_boxed_path()
    }
}
