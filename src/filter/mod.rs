//! Filtering engine for char streams.
//!
//! - [`StreamFilter`] - Stateful read-match-splice-emit engine
//! - [`TokenSet`] - Validated token → replacement mapping
//! - [`Replacer`] - Validated configuration producing filters

mod engine;
mod replacer;
mod tokens;

pub use engine::StreamFilter;
pub use replacer::Replacer;
pub use tokens::TokenSet;
