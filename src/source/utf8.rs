//! UTF-8 bridging between byte streams and char streams.
//!
//! Multi-byte sequences can split across reads in both directions:
//!
//! - [`Utf8Decoder`] carries an incomplete trailing sequence (at most three
//!   bytes) over to the next input chunk
//! - [`Utf8Reader`] carries encoded bytes that did not fit the caller's
//!   buffer over to the next `read`

use std::collections::VecDeque;
use std::io;

use bytes::{Buf, BytesMut};

use super::CharSource;
use crate::config::DEFAULT_READ_BUFFER_SIZE;

/// Incremental UTF-8 decoder.
///
/// Invalid input is fatal: once a bad sequence is seen, every later call
/// fails with [`io::ErrorKind::InvalidData`].
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    carry: BytesMut,
    /// Input offset of the first invalid sequence.
    invalid_at: Option<u64>,
    consumed: u64,
}

impl Utf8Decoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decodes every complete sequence of `input` (after any carried bytes)
    /// into `out`.
    ///
    /// On invalid input the valid prefix is still pushed to `out`; the rest
    /// is dropped.
    pub(crate) fn decode(&mut self, input: &[u8], out: &mut VecDeque<char>) -> io::Result<()> {
        self.check()?;

        let decoded = if self.carry.is_empty() {
            decode_prefix(input, out).map(|used| {
                self.carry.extend_from_slice(&input[used..]);
                used
            })
        } else {
            self.carry.extend_from_slice(input);
            decode_prefix(&self.carry, out).map(|used| {
                self.carry.advance(used);
                used
            })
        };

        match decoded {
            Ok(used) => {
                self.consumed += used as u64;
                Ok(())
            }
            Err(valid) => {
                self.invalid_at = Some(self.consumed + valid as u64);
                self.carry.clear();
                self.check()
            }
        }
    }

    /// Fails if invalid input was seen.
    pub(crate) fn check(&self) -> io::Result<()> {
        match self.invalid_at {
            None => Ok(()),
            Some(offset) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid UTF-8 at byte {}", offset),
            )),
        }
    }

    /// Checks that the input did not end inside a sequence.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        self.check()?;
        if self.carry.is_empty() {
            return Ok(());
        }
        self.invalid_at = Some(self.consumed);
        self.carry.clear();
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "stream ended inside a UTF-8 sequence",
        ))
    }

    /// Returns the number of carried bytes.
    #[cfg(test)]
    pub(crate) fn carried(&self) -> usize {
        self.carry.len()
    }
}

/// Decodes the longest valid prefix of `bytes` and returns its length.
///
/// Only an incomplete sequence at the very end is left undecoded. Anything
/// else that is not UTF-8 yields `Err` with the length of the valid prefix,
/// which has still been pushed to `out`.
fn decode_prefix(bytes: &[u8], out: &mut VecDeque<char>) -> Result<usize, usize> {
    let (valid, invalid) = match std::str::from_utf8(bytes) {
        Ok(s) => {
            out.extend(s.chars());
            return Ok(bytes.len());
        }
        Err(e) => (e.valid_up_to(), e.error_len().is_some()),
    };

    if let Ok(s) = std::str::from_utf8(&bytes[..valid]) {
        out.extend(s.chars());
    }
    if invalid { Err(valid) } else { Ok(valid) }
}

/// Adapts a [`CharSource`] (typically a [`StreamFilter`](crate::StreamFilter))
/// into a UTF-8 [`io::Read`].
///
/// Closing is left to the inner source; use
/// [`into_inner`](Self::into_inner) to get it back.
#[derive(Debug)]
pub struct Utf8Reader<S> {
    inner: S,
    chars: Vec<char>,
    pending: BytesMut,
}

impl<S: CharSource> Utf8Reader<S> {
    /// Wraps `inner` with the default buffer size.
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, DEFAULT_READ_BUFFER_SIZE)
    }

    /// Wraps `inner`, pulling at most `capacity` chars per inner read.
    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            chars: vec!['\0'; capacity.max(1)],
            pending: BytesMut::new(),
        }
    }

    /// Gets a reference to the inner source.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Gets a mutable reference to the inner source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwraps the reader. Encoded bytes not yet read are lost.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: CharSource> io::Read for Utf8Reader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.pending.is_empty() {
            // Every char needs at least one byte.
            let want = buf.len().min(self.chars.len());
            let n = self.inner.read_chars(&mut self.chars[..want])?;
            if n == 0 {
                return Ok(0);
            }

            let mut utf8 = [0u8; 4];
            for ch in &self.chars[..n] {
                self.pending
                    .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
        }

        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        Ok(n)
    }
}
