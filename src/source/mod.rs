//! Character sources feeding a filter.
//!
//! - [`CharSource`] - The minimal pull interface a filter reads from
//! - [`ReadSource`] - Incremental UTF-8 decoding over any [`std::io::Read`]
//! - [`Utf8Reader`] - Any char source as a UTF-8 [`std::io::Read`]
//!
//! `CharSource` is also implemented for [`std::str::Chars`], `&mut S`,
//! `Box<S>` and [`StreamFilter`](crate::StreamFilter) itself, so filters
//! can be chained and sources can be lent instead of moved.

mod reader;
mod utf8;

use std::io;

pub use reader::ReadSource;
pub(crate) use utf8::Utf8Decoder;
pub use utf8::Utf8Reader;

/// A pull-based source of chars.
pub trait CharSource {
    /// Reads up to `buf.len()` chars into `buf`.
    ///
    /// Returns the number of chars written. `Ok(0)` with a non-empty `buf`
    /// means the source has no more data. A short read does not imply end of
    /// data.
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize>;

    /// Releases the source. Further reads are unspecified.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        (**self).read_chars(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        (**self).read_chars(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl CharSource for std::str::Chars<'_> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.next() {
                Some(ch) => {
                    *slot = ch;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}
