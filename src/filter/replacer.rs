//! High-level entry point - Replacer.
//!
//! A [`Replacer`] validates a token mapping and a [`FilterConfig`] once and
//! then stamps out filters sharing the same token set:
//!
//! - [`Replacer::filter`] - Filter any [`CharSource`]
//! - [`Replacer::filter_reader`] - UTF-8 bytes in, UTF-8 bytes out
//! - [`Replacer::replace_str`] - Convenience for in-memory text

use std::io::Read;
use std::sync::Arc;

use crate::buffer::{Lookahead, RingLookahead};
use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::filter::{StreamFilter, TokenSet};
use crate::source::{CharSource, ReadSource, Utf8Reader};

/// A reusable, validated token → replacement configuration.
///
/// Cloning is cheap; the token set is shared.
///
/// # Example
///
/// ```
/// use tokenfilter::Replacer;
///
/// let replacer = Replacer::new([("${fname}", "John"), ("${lname}", "Doe")])?;
/// assert_eq!(replacer.replace_str("${fname} ${lname}")?, "John Doe");
/// # Ok::<(), tokenfilter::FilterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Replacer {
    tokens: Arc<TokenSet>,
    config: FilterConfig,
}

impl Replacer {
    /// Creates a replacer with the default configuration.
    pub fn new<I, K, V>(mapping: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_config(mapping, FilterConfig::default())
    }

    /// Creates a replacer with an explicit configuration.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidArgument`] for an empty token, an invalid
    /// configuration, or a lookahead capacity below the longest token.
    pub fn with_config<I, K, V>(mapping: I, config: FilterConfig) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_tokens(Arc::new(TokenSet::new(mapping)?), config)
    }

    /// Creates a replacer around an already built token set.
    pub fn from_tokens(tokens: Arc<TokenSet>, config: FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        config.resolve_capacity(tokens.max_key_len())?;
        Ok(Self { tokens, config })
    }

    /// Creates a filter over `source`.
    pub fn filter<S: CharSource>(&self, source: S) -> Result<StreamFilter<S>, FilterError> {
        self.filter_with::<S, RingLookahead>(source)
    }

    /// Creates a filter over `source` using the lookahead strategy `L`.
    pub fn filter_with<S: CharSource, L: Lookahead>(
        &self,
        source: S,
    ) -> Result<StreamFilter<S, L>, FilterError> {
        StreamFilter::with_tokens(source, Arc::clone(&self.tokens), &self.config)
    }

    /// Filters UTF-8 text from `reader`, producing UTF-8 bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Read;
    /// use tokenfilter::Replacer;
    ///
    /// let replacer = Replacer::new([("${name}", "World")])?;
    /// let mut reader = replacer.filter_reader(&b"Hello ${name}!"[..])?;
    ///
    /// let mut out = String::new();
    /// reader.read_to_string(&mut out)?;
    /// assert_eq!(out, "Hello World!");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn filter_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<Utf8Reader<StreamFilter<ReadSource<R>>>, FilterError> {
        let source = ReadSource::with_capacity(reader, self.config.read_buffer_size());
        let filter = self.filter(source)?;
        Ok(Utf8Reader::with_capacity(filter, self.config.read_buffer_size()))
    }

    /// Filters an in-memory string.
    pub fn replace_str(&self, input: &str) -> Result<String, FilterError> {
        let mut filter = self.filter(input.chars())?;
        let mut out = String::with_capacity(input.len());
        filter.read_to_string(&mut out)?;
        Ok(out)
    }

    /// Returns the shared token set.
    pub fn tokens(&self) -> &Arc<TokenSet> {
        &self.tokens
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_str() {
        let replacer = Replacer::new([("${a}", "1"), ("${b}", "2")]).unwrap();
        assert_eq!(replacer.replace_str("${a}+${b}=3").unwrap(), "1+2=3");
        assert_eq!(replacer.replace_str("").unwrap(), "");
    }

    #[test]
    fn test_filters_share_tokens() {
        let replacer = Replacer::new([("x", "y")]).unwrap();
        let f1 = replacer.filter("x".chars()).unwrap();
        let f2 = replacer.filter("xx".chars()).unwrap();
        assert!(Arc::ptr_eq(f1.tokens(), f2.tokens()));
        assert_eq!(Arc::strong_count(replacer.tokens()), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FilterConfig::default().with_lookahead_capacity(2);
        assert!(Replacer::with_config([("${long}", "x")], config).is_err());

        let config = FilterConfig::default().with_read_buffer_size(0);
        assert!(Replacer::with_config([("a", "b")], config).is_err());
    }

    #[test]
    fn test_filter_reader_small_buffers() {
        let config = FilterConfig::default().with_read_buffer_size(1);
        let replacer = Replacer::with_config([("€", "EUR"), ("£", "GBP")], config).unwrap();
        let mut reader = replacer.filter_reader("5€ or 4£".as_bytes()).unwrap();

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "5EUR or 4GBP");
    }
}
