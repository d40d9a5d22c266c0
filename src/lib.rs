//! Deterministic, line-oriented dumps of a git repository's history
//!
//! - `areas`: the repository on disk (object database, references)
//! - `artifacts`: git objects, tree comparison, history walking and the dump
//!   line renderers
//! - `commands`: entry points operating on a [`areas::repository::Repository`]

pub mod areas;
pub mod artifacts;
pub mod commands;

#[cfg(test)]
pub(crate) mod test_support;
