//! tokenfilter
//!
//! Streaming token replacement for Rust.
//!
//! `tokenfilter` transforms a stream of characters by replacing every
//! occurrence of a fixed set of tokens with their configured replacements,
//! holding no more than the longest token in memory. It is designed as a
//! small, composable primitive for:
//!
//! - template expansion (`${name}` placeholders)
//! - configuration file rendering
//! - rewriting text on its way between a reader and a writer
//!
//! The crate intentionally:
//! - does NOT support patterns or regular expressions, only fixed tokens
//! - does NOT re-scan replacement text
//! - does NOT manage files or paths
//!
//! It only does one thing: **Read chars → replace tokens → yield chars**
//!
//! When a token is a prefix of another token, the longest token that
//! matches at the current position wins.
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use std::io;
//! use tokenfilter::{FilterError, Replacer};
//!
//! fn main() -> Result<(), FilterError> {
//!     let replacer = Replacer::new([("${name}", "World")])?;
//!     let mut reader = replacer.filter_reader(File::open("template.txt")?)?;
//!
//!     io::copy(&mut reader, &mut io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use tokenfilter::{filter_async, Replacer};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), tokenfilter::FilterError> {
//!     let replacer = Replacer::new([("${name}", "World")])?;
//!     let mut stream = filter_async(reader, &replacer)?;
//!
//!     while let Some(text) = stream.next().await {
//!         print!("{}", text?);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod filter;

mod buffer; // ring buffer and lookahead strategies
mod index; // prefix tree over token keys
mod source; // char sources and UTF-8 bridging

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use buffer::{Lookahead, NaiveLookahead, Refill, RingBuffer, RingLookahead};
pub use config::{DEFAULT_READ_BUFFER_SIZE, FilterConfig};
pub use error::FilterError;
pub use filter::{Replacer, StreamFilter, TokenSet};
pub use index::{KeyMatch, PrefixMatchIndex};
pub use source::{CharSource, ReadSource, Utf8Reader};

#[cfg(feature = "async-io")]
pub use async_stream::{FilterStream, filter_async};
