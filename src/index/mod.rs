//! Token lookup.
//!
//! - [`PrefixMatchIndex`] - Path-compressed prefix tree over the token keys

mod tree;

pub use tree::{KeyMatch, PrefixMatchIndex};
