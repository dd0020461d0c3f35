//! Fixed-capacity circular char buffer.
//!
//! Memory usage is flat: storage is allocated once and never grows. Once the
//! buffer is full, appending overwrites the oldest char.

use crate::error::FilterError;

/// Circular FIFO store of chars with logical random access.
///
/// Logical index `i` (oldest first) lives in physical slot
/// `(start + i) % capacity`.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    storage: Box<[char]>,
    start: usize,
    len: usize,
}

impl RingBuffer {
    /// Creates an empty buffer holding at most `capacity` chars.
    ///
    /// Returns [`FilterError::InvalidArgument`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::InvalidArgument {
                message: "ring buffer capacity must be non-zero",
            });
        }

        Ok(Self {
            storage: vec!['\0'; capacity].into_boxed_slice(),
            start: 0,
            len: 0,
        })
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no chars are buffered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next append will evict the oldest char.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Returns the number of chars that can be appended without eviction.
    pub fn free(&self) -> usize {
        self.capacity() - self.len
    }

    #[inline]
    fn physical(&self, index: usize) -> usize {
        (self.start + index) % self.capacity()
    }

    /// Returns the `index`-th oldest char.
    pub fn char_at(&self, index: usize) -> Result<char, FilterError> {
        if index >= self.len {
            return Err(FilterError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.storage[self.physical(index)])
    }

    /// Appends a char, evicting the oldest one when full.
    pub fn append(&mut self, ch: char) {
        if self.len < self.capacity() {
            let slot = self.physical(self.len);
            self.storage[slot] = ch;
            self.len += 1;
        } else {
            self.storage[self.start] = ch;
            self.start = (self.start + 1) % self.capacity();
        }
    }

    /// Appends every char of `chars` in order.
    pub fn extend_from_slice(&mut self, chars: &[char]) {
        for &ch in chars {
            self.append(ch);
        }
    }

    /// Appends every char of `s` in order.
    pub fn append_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.append(ch);
        }
    }

    /// Removes and returns the oldest char, or `None` when empty.
    #[inline]
    pub fn take(&mut self) -> Option<char> {
        if self.len == 0 {
            return None;
        }

        let ch = self.storage[self.start];
        self.start = (self.start + 1) % self.capacity();
        self.len -= 1;
        Some(ch)
    }

    /// Drops up to `count` of the oldest chars and returns how many were dropped.
    pub fn discard(&mut self, count: usize) -> usize {
        let count = count.min(self.len);
        self.start = (self.start + count) % self.capacity();
        self.len -= count;
        count
    }

    /// Copies the logical contents, oldest first, into `out` (cleared first).
    pub fn materialize_into(&self, out: &mut Vec<char>) {
        out.clear();
        out.reserve(self.len);

        // Portion up to the physical end, then the wrapped remainder.
        let head = (self.capacity() - self.start).min(self.len);
        out.extend_from_slice(&self.storage[self.start..self.start + head]);
        out.extend_from_slice(&self.storage[..self.len - head]);
    }

    /// Returns the logical contents, oldest first.
    pub fn materialize(&self) -> Vec<char> {
        let mut out = Vec::with_capacity(self.len);
        self.materialize_into(&mut out);
        out
    }

    /// Iterates over the logical contents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.len).map(move |i| self.storage[self.physical(i)])
    }

    /// Empties the buffer without releasing storage.
    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }
}

impl std::fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;

        for ch in self.iter() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}
