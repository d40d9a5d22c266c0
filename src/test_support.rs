//! Fixture repositories written straight into the object database, so unit
//! tests do not need the git CLI.

use crate::areas::refs::SymRefName;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use assert_fs::TempDir;
use chrono::{FixedOffset, TimeZone};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;
use std::rc::Rc;

/// `Write` handle whose bytes stay readable after the repository took it
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is not UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct TestRepository {
    // keeps the directory alive for the repository's lifetime
    _dir: TempDir,
    repository: Repository,
    output: SharedBuffer,
}

impl TestRepository {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output = SharedBuffer::default();
        let repository = Repository::init(
            dir.path().to_str().expect("temp dir is not UTF-8"),
            Box::new(output.clone()),
        )
        .expect("Failed to init repository");

        TestRepository {
            _dir: dir,
            repository,
            output,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn output(&self) -> String {
        self.output.contents()
    }

    pub fn output_lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_string).collect()
    }

    pub fn blob(&self, content: impl Into<bytes::Bytes>) -> ObjectId {
        self.repository
            .database()
            .store(&Blob::new(content))
            .expect("Failed to store blob")
    }

    /// Write nested trees for `files`, given as `("dir/name.txt", "content")`.
    pub fn tree(&self, files: &[(&str, &str)]) -> ObjectId {
        let files = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect::<Vec<_>>();

        self.write_tree(&files)
    }

    fn write_tree(&self, files: &[(String, String)]) -> ObjectId {
        let mut entries = Vec::new();
        let mut dirs: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();

        for (path, content) in files {
            match path.split_once('/') {
                Some((dir, rest)) => dirs
                    .entry(dir.to_string())
                    .or_default()
                    .push((rest.to_string(), content.clone())),
                None => entries.push((
                    path.clone(),
                    DatabaseEntry::new(
                        self.blob(content.clone()),
                        EntryMode::File(FileMode::Regular),
                    ),
                )),
            }
        }

        for (dir, files) in dirs {
            let oid = self.write_tree(&files);
            entries.push((dir, DatabaseEntry::new(oid, EntryMode::Directory)));
        }

        self.raw_tree(entries)
    }

    /// Write a single tree object with exactly these entries, in git order.
    pub fn raw_tree(&self, entries: Vec<(String, DatabaseEntry)>) -> ObjectId {
        self.repository
            .database()
            .store(&Tree::build(entries))
            .expect("Failed to store tree")
    }

    /// Commit `tree` at `seconds` past the epoch (UTC), authored and committed
    /// by the same test user.
    pub fn commit(
        &self,
        tree: &ObjectId,
        parents: &[&ObjectId],
        message: &str,
        seconds: i64,
    ) -> ObjectId {
        let timestamp = FixedOffset::east_opt(0)
            .and_then(|offset| offset.timestamp_opt(seconds, 0).single())
            .expect("Invalid timestamp");
        let author = Author::new(
            "Test User".to_string(),
            "test@example.com".to_string(),
            timestamp,
        );

        let commit = Commit::new(
            parents.iter().map(|parent| (*parent).clone()).collect(),
            tree.clone(),
            author.clone(),
            author,
            message.to_string(),
        );

        self.repository
            .database()
            .store(&commit)
            .expect("Failed to store commit")
    }

    pub fn set_branch(&self, name: &str, oid: &ObjectId) {
        self.repository
            .refs()
            .update_ref(&SymRefName::new(format!("refs/heads/{name}")), oid)
            .expect("Failed to update branch");
    }

    pub fn set_tag(&self, name: &str, oid: &ObjectId) {
        self.repository
            .refs()
            .update_ref(&SymRefName::new(format!("refs/tags/{name}")), oid)
            .expect("Failed to update tag");
    }
}
