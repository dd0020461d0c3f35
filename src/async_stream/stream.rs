//! Async stream adapter for filtering.
//!
//! This module provides asynchronous filtering using the `futures-io::AsyncRead`
//! trait, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! The synchronous [`StreamFilter`] does the work. Decoded input is queued in
//! a source that reports `WouldBlock` while the queue is empty and the reader
//! has not ended; the filter keeps its lookahead across that error, so the
//! stream just polls the reader and reads again.
//!
//! # Example
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

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::error::FilterError;
use crate::filter::{Replacer, StreamFilter};
use crate::source::{CharSource, Utf8Decoder};

/// Chars decoded so far, waiting to be pulled by the filter.
#[derive(Debug, Default)]
struct PendingChars {
    queue: VecDeque<char>,
    decoder: Utf8Decoder,
    eof: bool,
}

impl PendingChars {
    fn push(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.decoder.decode(bytes, &mut self.queue)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.eof = true;
        self.decoder.finish()
    }
}

impl CharSource for PendingChars {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        if self.queue.is_empty() {
            if self.eof {
                return Ok(0);
            }
            return Err(io::ErrorKind::WouldBlock.into());
        }

        let n = buf.len().min(self.queue.len());
        for (slot, ch) in buf.iter_mut().zip(self.queue.drain(..n)) {
            *slot = ch;
        }
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        self.queue.clear();
        self.eof = true;
        Ok(())
    }
}

pin_project! {
    /// A stream of filtered text read from an async reader.
    ///
    /// Each item is the filtered output available so far, at most the
    /// configured read buffer size in chars.
    pub struct FilterStream<R> {
        #[pin]
        reader: R,
        filter: StreamFilter<PendingChars>,
        bytes: Vec<u8>,
        out: Vec<char>,
        finished: bool,
    }
}

impl<R: AsyncRead> FilterStream<R> {
    /// Creates a filtering stream from an async reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - An async reader implementing `AsyncRead`
    /// * `replacer` - The tokens and configuration to filter with
    pub fn new(reader: R, replacer: &Replacer) -> Result<Self, FilterError> {
        let size = replacer.config().read_buffer_size();
        Ok(Self {
            reader,
            filter: replacer.filter(PendingChars::default())?,
            bytes: vec![0u8; size],
            out: vec!['\0'; size],
            finished: false,
        })
    }
}

impl<R: AsyncRead> Stream for FilterStream<R> {
    type Item = Result<String, FilterError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            match this.filter.read(&mut this.out[..]) {
                Ok(Some(n)) => {
                    return Poll::Ready(Some(Ok(this.out[..n].iter().collect())));
                }
                Ok(None) => {
                    *this.finished = true;
                    return Poll::Ready(None);
                }
                Err(FilterError::Io(e)) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
            }

            // The filter needs more input.
            let pushed = match this.reader.as_mut().poll_read(cx, &mut this.bytes[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => Err(e),
                Poll::Ready(Ok(0)) => this.filter.get_mut().finish(),
                Poll::Ready(Ok(n)) => this.filter.get_mut().push(&this.bytes[..n]),
            };

            if let Err(e) = pushed {
                *this.finished = true;
                return Poll::Ready(Some(Err(FilterError::Io(e))));
            }
        }
    }
}

/// Creates a filtering stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
/// This works with any async runtime (tokio, async-std, smol, etc.).
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use tokenfilter::{filter_async, Replacer};
///
/// let tokio_reader = tokio::fs::File::open("template.txt").await?;
/// let stream = filter_async(tokio_reader.compat(), &replacer)?;
/// ```
///
/// # Returns
///
/// A `FilterStream` that implements `Stream<Item = Result<String, FilterError>>`
pub fn filter_async<R: AsyncRead>(
    reader: R,
    replacer: &Replacer,
) -> Result<FilterStream<R>, FilterError> {
    FilterStream::new(reader, replacer)
}
