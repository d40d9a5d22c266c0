//! Line-oriented history dump
//!
//! Every object reachable from the walked commits is written exactly once:
//!
//! - `ledger`: which blobs, trees and commits were already written, plus the
//!   blobs that change lines promised to write
//! - `commit_renderer`: commit metadata, then change lines, then the root tree
//! - `diff_classifier`: one `file*` line per change against the first parent
//! - `tree_walker`: tree headers and entry lines, depth first
//! - `blob_emitter`: JSON-escaped blob content
//! - `ref_lister`: branch and tag lines
//! - `json`: the string encoder shared by messages and blobs
//! - `since`: parsing of the lower timestamp bound
//!
//! All state lives in a [`DumpContext`] created for one dump and dropped
//! afterwards.

pub mod blob_emitter;
pub mod commit_renderer;
pub mod diff_classifier;
pub mod json;
pub mod ledger;
pub mod ref_lister;
pub mod since;
pub mod tree_walker;

use crate::areas::database::Database;
use crate::artifacts::diff::rename_detector::DEFAULT_RENAME_THRESHOLD;
use crate::artifacts::dump::ledger::DumpLedger;
use crate::artifacts::log::rev_list::WalkOrder;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

pub const DEFAULT_REPO_PLACEHOLDER: &str = "<repo id/nwo>";
pub const DEFAULT_DATE_PLACEHOLDER: &str = "<push-date>";

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Unsupported change status '{status}' for {path} in commit {commit}")]
    UnsupportedChangeStatus {
        commit: ObjectId,
        path: String,
        status: char,
    },

    #[error("Blob {oid} is not valid UTF-8 text")]
    BinaryBlob {
        oid: ObjectId,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Invalid since timestamp: {0}")]
    InvalidSince(String),
}

/// Shape of the per-entry `tree` lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeLineFormat {
    /// `tree <id> <kind> <child-id> <name> <mode>`
    #[default]
    Detailed,
    /// `tree <id> <kind> <child-id>`
    Minimal,
}

#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub order: WalkOrder,
    /// Only commits with a committer time at or after this bound are written
    pub since: Option<DateTime<FixedOffset>>,
    pub include_refs: bool,
    pub tree_line_format: TreeLineFormat,
    /// Sort the tree and blob lines of each commit
    pub sort_objects: bool,
    pub rename_threshold: u8,
    /// Escape every non-ASCII character in JSON strings
    pub ascii_only: bool,
    pub repo_placeholder: String,
    pub date_placeholder: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            order: WalkOrder::default(),
            since: None,
            include_refs: true,
            tree_line_format: TreeLineFormat::default(),
            sort_objects: true,
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            ascii_only: true,
            repo_placeholder: DEFAULT_REPO_PLACEHOLDER.to_string(),
            date_placeholder: DEFAULT_DATE_PLACEHOLDER.to_string(),
        }
    }
}

/// State of one dump run
pub struct DumpContext<'r> {
    database: &'r Database,
    options: &'r DumpOptions,
    ledger: DumpLedger,
}

impl<'r> DumpContext<'r> {
    pub fn new(database: &'r Database, options: &'r DumpOptions) -> Self {
        DumpContext {
            database,
            options,
            ledger: DumpLedger::default(),
        }
    }

    pub fn ledger(&self) -> &DumpLedger {
        &self.ledger
    }
}
