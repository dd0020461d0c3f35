//! The validated token → replacement mapping.

use std::collections::BTreeMap;

use crate::error::FilterError;
use crate::index::{KeyMatch, PrefixMatchIndex};

/// Immutable set of tokens and their replacements.
///
/// Built once, then shared read-only (behind an `Arc`) by any number of
/// filters.
#[derive(Debug, Clone)]
pub struct TokenSet {
    index: PrefixMatchIndex,
    replacements: Vec<String>,
}

impl TokenSet {
    /// Builds a token set from `(token, replacement)` pairs in any order.
    ///
    /// If a token appears more than once, its last replacement is kept.
    /// Returns [`FilterError::InvalidArgument`] for an empty token.
    ///
    /// # Example
    ///
    /// ```
    /// use tokenfilter::TokenSet;
    ///
    /// let tokens = TokenSet::new([("${name}", "World"), ("${greeting}", "Hello")])?;
    /// assert_eq!(tokens.len(), 2);
    /// assert_eq!(tokens.max_key_len(), 11);
    /// # Ok::<(), tokenfilter::FilterError>(())
    /// ```
    pub fn new<I, K, V>(mapping: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: BTreeMap<String, String> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        // BTreeMap order is byte order, which for UTF-8 is the char order the
        // index sorts by, so index ids line up with `replacements`.
        let index = PrefixMatchIndex::new(mapping.keys())?;
        let replacements: Vec<String> = mapping.into_values().collect();
        debug_assert_eq!(index.len(), replacements.len());

        Ok(Self {
            index,
            replacements,
        })
    }

    /// Returns the search index over the tokens.
    pub fn index(&self) -> &PrefixMatchIndex {
        &self.index
    }

    /// Returns the longest token that `window` starts with.
    pub fn start_of(&self, window: &[char]) -> Option<KeyMatch<'_>> {
        self.index.start_of(window)
    }

    /// Returns the token with the given id.
    pub fn key(&self, id: usize) -> Option<&str> {
        self.index.key(id)
    }

    /// Returns the replacement for the token with the given id.
    pub fn replacement(&self, id: usize) -> Option<&str> {
        self.replacements.get(id).map(String::as_str)
    }

    /// Returns the replacement for `token`, if it is part of the set.
    pub fn get(&self, token: &str) -> Option<&str> {
        let chars: Vec<char> = token.chars().collect();
        self.index
            .start_of(&chars)
            .filter(|m| m.char_len == chars.len())
            .and_then(|m| self.replacement(m.id))
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Returns the length in chars of the longest token (0 when empty).
    pub fn max_key_len(&self) -> usize {
        self.index.max_key_len()
    }

    /// Iterates over `(token, replacement)` pairs in sorted token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.index
            .keys()
            .zip(self.replacements.iter().map(String::as_str))
    }
}
