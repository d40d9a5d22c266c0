//! Commit history traversal
//!
//! - `rev_list`: ordered walk of every commit reachable from a starting
//!   commit, optionally bounded by a committer timestamp
//!
//! Two orders are supported. The topological order yields every commit after
//! all of its ancestors (oldest first, first-parent line before side
//! branches). The chronological order uses a priority queue keyed by
//! committer timestamp, newest first, like plain `git log`.

pub mod rev_list;
