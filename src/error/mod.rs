//! Error types for tokenfilter.

use std::fmt;
use std::io;

/// Errors that can occur while building or reading a filter.
#[derive(Debug)]
pub enum FilterError {
    /// An I/O error reported by the source stream.
    ///
    /// The filter does not interpret it. Lookahead state is preserved, so the
    /// read may be retried.
    Io(io::Error),

    /// Invalid construction parameter.
    InvalidArgument {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// Logical index outside the occupied part of a ring buffer.
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of occupied slots.
        len: usize,
    },

    /// The filter was read after [`close`](crate::StreamFilter::close).
    ClosedStream,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Io(e) => write!(f, "source read error: {}", e),
            FilterError::InvalidArgument { message } => {
                write!(f, "invalid argument: {}", message)
            }
            FilterError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for buffer of length {}", index, len)
            }
            FilterError::ClosedStream => write!(f, "stream closed"),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FilterError {
    fn from(e: io::Error) -> Self {
        FilterError::Io(e)
    }
}

impl From<FilterError> for io::Error {
    fn from(e: FilterError) -> Self {
        match e {
            FilterError::Io(e) => e,
            FilterError::InvalidArgument { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            FilterError::IndexOutOfRange { .. } => io::Error::other(e),
            FilterError::ClosedStream => io::Error::new(io::ErrorKind::NotConnected, e),
        }
    }
}

impl FilterError {
    /// Returns `true` if this is a source error that leaves the filter
    /// resumable (`WouldBlock` or `Interrupted`).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FilterError::Io(e) if matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
            )
        )
    }
}
