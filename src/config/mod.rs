//! Configuration for filtering behavior.
//!
//! - [`FilterConfig`] - Lookahead sizing and byte buffering

use crate::error::FilterError;

/// Default size of the byte buffer used by [`std::io::Read`] adapters (8 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Configuration for a token filter.
///
/// The lookahead capacity defaults to the length (in chars) of the longest
/// token, with a minimum of one. An explicit capacity may be larger, never
/// smaller; this is checked when the filter is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterConfig {
    lookahead_capacity: Option<usize>,
    read_buffer_size: usize,
}

impl FilterConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if either size is zero.
    pub fn new(
        lookahead_capacity: Option<usize>,
        read_buffer_size: usize,
    ) -> Result<Self, FilterError> {
        if lookahead_capacity == Some(0) {
            return Err(FilterError::InvalidArgument {
                message: "lookahead capacity must be non-zero",
            });
        }

        if read_buffer_size == 0 {
            return Err(FilterError::InvalidArgument {
                message: "read buffer size must be non-zero",
            });
        }

        Ok(Self {
            lookahead_capacity,
            read_buffer_size,
        })
    }

    /// Sets an explicit lookahead capacity.
    pub fn with_lookahead_capacity(mut self, capacity: usize) -> Self {
        self.lookahead_capacity = Some(capacity);
        self
    }

    /// Sets the byte buffer size used when reading from [`std::io::Read`].
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Returns the explicit lookahead capacity, if any.
    pub fn lookahead_capacity(&self) -> Option<usize> {
        self.lookahead_capacity
    }

    /// Returns the byte buffer size for reader adapters.
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Resolves the lookahead capacity for a token set whose longest key is
    /// `max_key_len` chars.
    pub fn resolve_capacity(&self, max_key_len: usize) -> Result<usize, FilterError> {
        let required = max_key_len.max(1);
        match self.lookahead_capacity {
            None => Ok(required),
            Some(capacity) if capacity >= required => Ok(capacity),
            Some(_) => Err(FilterError::InvalidArgument {
                message: "lookahead capacity is smaller than the longest token",
            }),
        }
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), FilterError> {
        Self::new(self.lookahead_capacity, self.read_buffer_size).map(|_| ())
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lookahead_capacity: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}
