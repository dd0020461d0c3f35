//! Lookahead strategies.
//!
//! A strategy holds the not-yet-emitted chars the filter inspects for a
//! token. [`RingLookahead`] is the bounded implementation used by default;
//! [`NaiveLookahead`] keeps a plain growable scratch string and exists as a
//! reference for differential testing.

use std::io;

use super::RingBuffer;
use crate::error::FilterError;
use crate::source::CharSource;

/// Outcome of a refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refill {
    /// The lookahead is at capacity.
    Full,
    /// The source reported end of data before the lookahead filled up.
    Exhausted,
}

/// Buffer strategy driven by [`StreamFilter`](crate::StreamFilter).
pub trait Lookahead {
    /// Creates an empty lookahead able to hold `capacity` chars.
    fn with_capacity(capacity: usize) -> Result<Self, FilterError>
    where
        Self: Sized;

    /// Returns the maximum number of buffered chars.
    fn capacity(&self) -> usize;

    /// Tops the lookahead up from `source` until it is full or the source is
    /// exhausted.
    ///
    /// On error, every char read before the failure stays buffered.
    fn refill(&mut self, source: &mut dyn CharSource) -> io::Result<Refill>;

    /// Returns `true` if any char is buffered.
    fn has_pending(&self) -> bool;

    /// Removes and returns the oldest buffered char.
    fn take_one(&mut self) -> Option<char>;

    /// Drops the `token_len` oldest chars (a matched token).
    fn splice(&mut self, token_len: usize);

    /// Copies the buffered chars, oldest first, into `out`.
    fn window_into(&self, out: &mut Vec<char>);

    /// Drops all buffered chars.
    fn clear(&mut self);
}

/// Ring-buffer lookahead with a fixed allocation.
#[derive(Debug, Clone)]
pub struct RingLookahead {
    ring: RingBuffer,
    scratch: Vec<char>,
}

impl RingLookahead {
    /// Returns the underlying ring buffer.
    pub fn ring(&self) -> &RingBuffer {
        &self.ring
    }
}

impl Lookahead for RingLookahead {
    fn with_capacity(capacity: usize) -> Result<Self, FilterError> {
        Ok(Self {
            ring: RingBuffer::new(capacity)?,
            scratch: vec!['\0'; capacity],
        })
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn refill(&mut self, source: &mut dyn CharSource) -> io::Result<Refill> {
        while !self.ring.is_full() {
            let free = self.ring.free();
            let n = source.read_chars(&mut self.scratch[..free])?;
            if n == 0 {
                return Ok(Refill::Exhausted);
            }
            self.ring.extend_from_slice(&self.scratch[..n.min(free)]);
        }
        Ok(Refill::Full)
    }

    fn has_pending(&self) -> bool {
        !self.ring.is_empty()
    }

    #[inline]
    fn take_one(&mut self) -> Option<char> {
        self.ring.take()
    }

    fn splice(&mut self, token_len: usize) {
        self.ring.discard(token_len);
    }

    fn window_into(&self, out: &mut Vec<char>) {
        self.ring.materialize_into(out);
    }

    fn clear(&mut self) {
        self.ring.clear();
    }
}

/// Growable scratch-string lookahead.
///
/// Simple and obviously correct, at the price of shifting the string on
/// every take.
#[derive(Debug, Clone, Default)]
pub struct NaiveLookahead {
    pending: String,
    pending_chars: usize,
    capacity: usize,
}

impl Lookahead for NaiveLookahead {
    fn with_capacity(capacity: usize) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::InvalidArgument {
                message: "lookahead capacity must be non-zero",
            });
        }

        Ok(Self {
            pending: String::new(),
            pending_chars: 0,
            capacity,
        })
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn refill(&mut self, source: &mut dyn CharSource) -> io::Result<Refill> {
        while self.pending_chars < self.capacity {
            let mut buf = vec!['\0'; self.capacity - self.pending_chars];
            let n = source.read_chars(&mut buf)?;
            if n == 0 {
                return Ok(Refill::Exhausted);
            }
            let n = n.min(buf.len());
            self.pending.extend(&buf[..n]);
            self.pending_chars += n;
        }
        Ok(Refill::Full)
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn take_one(&mut self) -> Option<char> {
        let ch = self.pending.chars().next()?;
        self.pending.drain(..ch.len_utf8());
        self.pending_chars -= 1;
        Some(ch)
    }

    fn splice(&mut self, token_len: usize) {
        let token_len = token_len.min(self.pending_chars);
        let end = self
            .pending
            .char_indices()
            .nth(token_len)
            .map_or(self.pending.len(), |(i, _)| i);
        self.pending.drain(..end);
        self.pending_chars -= token_len;
    }

    fn window_into(&self, out: &mut Vec<char>) {
        out.clear();
        out.extend(self.pending.chars());
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.pending_chars = 0;
    }
}
