//! [`CharSource`] over any [`std::io::Read`] producing UTF-8.

use std::collections::VecDeque;
use std::io::{self, Read};

use super::{CharSource, Utf8Decoder};
use crate::config::DEFAULT_READ_BUFFER_SIZE;

/// Decodes UTF-8 from a byte reader on demand.
///
/// Bytes are read in blocks of the configured size; sequences split between
/// blocks are reassembled. Invalid UTF-8, or input ending inside a sequence,
/// is reported as [`io::ErrorKind::InvalidData`]. Chars decoded before the
/// bad sequence are still handed out; after that every read fails.
///
/// # Example
///
/// ```
/// use tokenfilter::{CharSource, ReadSource};
///
/// let mut source = ReadSource::new("héllo".as_bytes());
/// let mut buf = ['\0'; 8];
/// let n = source.read_chars(&mut buf)?;
/// assert_eq!(buf[..n].iter().collect::<String>(), "héllo");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ReadSource<R> {
    reader: R,
    bytes: Vec<u8>,
    decoded: VecDeque<char>,
    decoder: Utf8Decoder,
    eof: bool,
}

impl<R: Read> ReadSource<R> {
    /// Creates a source with the default read buffer size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_READ_BUFFER_SIZE)
    }

    /// Creates a source reading at most `capacity` bytes at a time.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            bytes: vec![0u8; capacity.max(1)],
            decoded: VecDeque::new(),
            decoder: Utf8Decoder::new(),
            eof: false,
        }
    }

    /// Gets a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwraps this source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        while self.decoded.is_empty() && !self.eof {
            self.decoder.check()?;
            let n = match self.reader.read(&mut self.bytes) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                self.eof = true;
                self.decoder.finish()?;
            } else {
                self.decoder.decode(&self.bytes[..n], &mut self.decoded)?;
            }
        }

        let n = buf.len().min(self.decoded.len());
        for (slot, ch) in buf.iter_mut().zip(self.decoded.drain(..n)) {
            *slot = ch;
        }
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        self.decoded.clear();
        self.eof = true;
        Ok(())
    }
}
