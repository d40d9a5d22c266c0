//! Command implementations
//!
//! - `dump`: the history dump, `Repository::dump`

pub mod dump;
