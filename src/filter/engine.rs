//! Core filtering engine - StreamFilter.
//!
//! [`StreamFilter`] pulls chars from a [`CharSource`] into a bounded
//! lookahead, asks the token index whether the lookahead starts with a
//! token, and either splices the token out and replays its replacement or
//! emits the oldest buffered char.
//!
//! # States
//!
//! - **Scanning** - no replacement in flight; refill, match, emit
//! - **Replaying** - emitting a replacement verbatim; refilling and matching
//!   are paused, so replacement text is never re-scanned
//!
//! # Example
//!
//! ```
//! use tokenfilter::StreamFilter;
//!
//! let mut filter = StreamFilter::new("Hello ${name}!".chars(), [("${name}", "World")])?;
//!
//! let mut out = String::new();
//! filter.read_to_string(&mut out)?;
//! assert_eq!(out, "Hello World!");
//! # Ok::<(), tokenfilter::FilterError>(())
//! ```

use std::io;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::buffer::{Lookahead, Refill, RingLookahead};
use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::filter::TokenSet;
use crate::source::CharSource;

/// Replacement currently being emitted.
#[derive(Debug, Clone, Copy)]
struct Replay {
    id: usize,
    /// Byte offset of the next char to emit.
    pos: usize,
}

/// A streaming token-replacing filter over a char source.
///
/// Memory use is bounded by the lookahead capacity (the longest token, in
/// chars) regardless of input size.
///
/// # Errors and resumption
///
/// A source error aborts the current [`read`](Self::read). If no char was
/// produced by that call, the error is returned right away; otherwise the
/// call returns the chars already produced and the error is reported by the
/// next call. Buffered chars are never dropped on error, so after a
/// transient error (`WouldBlock`, `Interrupted`) reading simply resumes.
///
/// This follows the [`std::io::Read::read`] convention that a read which has
/// already transferred data reports success, rather than aborting the bulk
/// read and losing the chars written into `buf`.
///
/// # Closing
///
/// [`close`](Self::close) closes the source. Every later read fails with
/// [`FilterError::ClosedStream`]; closing again is a no-op.
#[derive(Debug)]
pub struct StreamFilter<S, L = RingLookahead> {
    source: S,
    tokens: Arc<TokenSet>,
    lookahead: L,
    window: Vec<char>,
    active: Option<Replay>,
    exhausted: bool,
    deferred: Option<io::Error>,
    closed: bool,
}

impl<S: CharSource> StreamFilter<S> {
    /// Creates a filter over `source` replacing the tokens of `mapping`.
    ///
    /// The lookahead holds as many chars as the longest token (at least one,
    /// so an empty mapping passes input through unchanged).
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidArgument`] if a token is empty.
    pub fn new<I, K, V>(source: S, mapping: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tokens = Arc::new(TokenSet::new(mapping)?);
        Self::with_tokens(source, tokens, &FilterConfig::default())
    }
}

impl<S: CharSource, L: Lookahead> StreamFilter<S, L> {
    /// Creates a filter sharing an existing token set.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidArgument`] if the configured lookahead capacity
    /// is smaller than the longest token.
    pub fn with_tokens(
        source: S,
        tokens: Arc<TokenSet>,
        config: &FilterConfig,
    ) -> Result<Self, FilterError> {
        config.validate()?;
        let capacity = config.resolve_capacity(tokens.max_key_len())?;
        let lookahead = L::with_capacity(capacity)?;

        debug!(
            "token filter ready: {} tokens, lookahead capacity {}",
            tokens.len(),
            capacity
        );

        Ok(Self {
            source,
            tokens,
            lookahead,
            window: Vec::with_capacity(capacity),
            active: None,
            exhausted: false,
            deferred: None,
            closed: false,
        })
    }

    /// Reads up to `buf.len()` filtered chars into `buf`.
    ///
    /// Returns `Ok(Some(n))` with the number of chars written, which is less
    /// than `buf.len()` only if the stream ended (or a source error is being
    /// deferred to the next call). Returns `Ok(None)` once the stream has no
    /// more chars to give. An empty `buf` yields `Ok(Some(0))`.
    ///
    /// # Errors
    ///
    /// - [`FilterError::ClosedStream`] after [`close`](Self::close)
    /// - [`FilterError::Io`] from the source
    pub fn read(&mut self, buf: &mut [char]) -> Result<Option<usize>, FilterError> {
        if self.closed {
            return Err(FilterError::ClosedStream);
        }
        if let Some(e) = self.deferred.take() {
            return Err(FilterError::Io(e));
        }
        if buf.is_empty() {
            return Ok(Some(0));
        }

        for (i, slot) in buf.iter_mut().enumerate() {
            match self.next_char() {
                Ok(Some(ch)) => *slot = ch,
                Ok(None) => return Ok(if i == 0 { None } else { Some(i) }),
                Err(FilterError::Io(e)) if i > 0 => {
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) {
                        debug!("source not ready after {} chars: {}", i, e);
                    } else {
                        warn!("deferring source error after {} chars: {}", i, e);
                    }
                    self.deferred = Some(e);
                    return Ok(Some(i));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Some(buf.len()))
    }

    /// Produces one output char, or `None` at end of data.
    fn next_char(&mut self) -> Result<Option<char>, FilterError> {
        loop {
            if let Some(replay) = self.active.as_mut() {
                let replacement = self.tokens.replacement(replay.id).unwrap_or_default();
                if let Some(ch) = replacement[replay.pos..].chars().next() {
                    replay.pos += ch.len_utf8();
                    if replay.pos == replacement.len() {
                        self.active = None;
                    }
                    return Ok(Some(ch));
                }
                self.active = None;
            }

            if !self.exhausted && self.lookahead.refill(&mut self.source)? == Refill::Exhausted {
                self.exhausted = true;
            }

            self.lookahead.window_into(&mut self.window);
            let Some(found) = self.tokens.start_of(&self.window) else {
                return Ok(self.lookahead.take_one());
            };
            let (id, char_len) = (found.id, found.char_len);
            trace!("replacing token {:?}", found.key);

            self.lookahead.splice(char_len);
            if self.tokens.replacement(id).is_some_and(|r| !r.is_empty()) {
                self.active = Some(Replay { id, pos: 0 });
            }
        }
    }

    /// Reads all remaining chars, appending them to `out`.
    ///
    /// Returns the number of chars appended.
    pub fn read_to_string(&mut self, out: &mut String) -> Result<usize, FilterError> {
        let mut buf = ['\0'; 1024];
        let mut total = 0;
        while let Some(n) = self.read(&mut buf)? {
            out.extend(&buf[..n]);
            total += n;
        }
        Ok(total)
    }

    /// Closes the filter and its source, releasing buffered state.
    ///
    /// Closing an already closed filter does nothing.
    pub fn close(&mut self) -> Result<(), FilterError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.lookahead.clear();
        self.window = Vec::new();
        self.active = None;
        self.deferred = None;

        debug!("closing token filter");
        self.source.close()?;
        Ok(())
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns `true` if a replacement is currently being emitted.
    pub fn is_replaying(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the shared token set.
    pub fn tokens(&self) -> &Arc<TokenSet> {
        &self.tokens
    }

    /// Returns the lookahead strategy.
    pub fn lookahead(&self) -> &L {
        &self.lookahead
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Gets a mutable reference to the underlying source.
    ///
    /// Reading from it directly skips the filter for those chars.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps the filter, returning the source. Buffered chars are lost.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: CharSource, L: Lookahead> CharSource for StreamFilter<S, L> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        Ok(self.read(buf)?.unwrap_or(0))
    }

    fn close(&mut self) -> io::Result<()> {
        StreamFilter::close(self).map_err(Into::into)
    }
}
