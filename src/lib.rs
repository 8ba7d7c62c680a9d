//! # SMGet Engine
//!
//! Client-side sort-merge-get for a sharded cache whose keys hold B-tree
//! collections.
//!
//! ## Core idea
//! A distributed smget reads the same BKey range from many cache keys, each
//! possibly on a different shard. Every shard returns its own key's
//! elements already sorted, but knows nothing about the others. The client
//! k-way merges those runs into one ordered, capped, optionally
//! deduplicated answer and reports which keys were missing or trimmed
//! inside the returned window.
//!
//! ```text
//! key:a  [1, 4, 9]        ┐
//! key:b  [2, 4]  trimmed  ├──► merge ──► [1@a, 2@b, 4@a, 4@b, 9@a]
//! key:c  NOT_FOUND        ┘              missed:  [key:c NOT_FOUND]
//!                                        trimmed: [key:b @ 4]
//! ```

pub mod bkey;
pub mod collection;
pub mod config;
pub mod element;
pub mod error;
pub mod merge;
pub mod query;
pub mod types;

// Public re-exports for the top-level API
pub use bkey::{BKey, BKeyKind, ByteBKey};
pub use collection::{ElementSet, ElementSetBuilder, KeyReply};
pub use config::MergeOptions;
pub use element::{EFlag, EFlagFilter, Element};
pub use error::{Error, Result};
pub use merge::{MergedElement, MergedResult, MissedKey, TrimmedKey, merge};
pub use query::SmgetQuery;
pub use types::{CacheKey, DedupMode, Direction, MissStatus};
