//! Frecency-ranked (command, directory) matching core for `cj`.
//!
//! The store is a flat, pipe-delimited line file rewritten atomically on
//! every record; queries reload it in full, classify each entry into a
//! match tier and reduce to the single best directory.

mod classifier;
mod config;
mod entry;
mod matcher;
mod query;
mod scorer;
mod store;

#[cfg(test)]
mod extra_tests;

pub use crate::classifier::eligible;
pub use crate::config::Config;
pub use crate::entry::{normalize_command, Entry};
pub use crate::matcher::{Candidate, MatchTier};
pub use crate::query::{
    add, list, query, reinforce, split_tokens, Action, QueryOptions, QueryResult,
};
pub use crate::scorer::{frecency, SortMethod};
pub use crate::store::EntryStore;

/// Return the current Unix time in whole seconds
pub fn current_time() -> i64 {
    match std::time::SystemTime::now().duration_since(std::time::SystemTime::UNIX_EPOCH) {
        Ok(n) => n.as_secs() as i64,
        Err(e) => {
            tracing::error!("invalid system time: {}", e);
            std::process::exit(1);
        }
    }
}
