//! Core repository components
//!
//! This module contains the parts of a Git repository the dump reads from:
//!
//! - `database`: Object database holding blobs, trees, and commits
//! - `refs`: Reference management (branches, HEAD, tags)
//! - `repository`: Locates the git directory and owns the output writer

pub mod database;
pub mod refs;
pub mod repository;
