//! Async streaming support for filtering.
//!
//! This module provides asynchronous filtering using the `futures-io::AsyncRead`
//! trait, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! - [`filter_async`] - Creates an async stream of filtered text from an async reader
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{FilterStream, filter_async};
