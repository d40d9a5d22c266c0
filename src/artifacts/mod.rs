//! Git data structures and algorithms
//!
//! - `database`: database entry types
//! - `diff`: tree comparison and rename detection
//! - `dump`: dump line rendering and the per-run ledger
//! - `log`: commit history traversal
//! - `objects`: git object types (blob, tree, commit)

pub mod database;
pub mod diff;
pub mod dump;
pub mod log;
pub mod objects;
