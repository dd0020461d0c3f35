//! Prefix-grouping search tree over a fixed set of keys.
//!
//! Keys are sorted, then grouped recursively by the char at the current
//! offset. Chains of single-child nodes are collapsed into one node, so
//! every branch point has at least two children or ends a key. Given the
//! list
//!
//! - `This is great`
//! - `This is exciting`
//! - `This was awesome`
//! - `This was wonderful`
//!
//! the tree is
//!
//! ```text
//! "This "
//!   "is "
//!     "exciting"
//!     "great"
//!   "was "
//!     "awesome"
//!     "wonderful"
//! ```
//!
//! Nodes live in a single arena and refer to their children by index.

use std::fmt;

use crate::error::FilterError;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node {
    fragment: Box<[char]>,
    children: Vec<usize>,
    /// Id of the key ending at this node.
    key: Option<usize>,
}

/// A key found at the start of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatch<'a> {
    /// Position of the key in the sorted key list.
    pub id: usize,
    /// The key itself.
    pub key: &'a str,
    /// Length of the key in chars.
    pub char_len: usize,
}

/// Immutable search structure answering "which key does this window start
/// with?" in one walk from the root.
///
/// When one key is a strict prefix of another, the longest key contained in
/// the window wins.
#[derive(Debug, Clone)]
pub struct PrefixMatchIndex {
    nodes: Vec<Node>,
    keys: Vec<String>,
    key_lens: Vec<usize>,
}

impl PrefixMatchIndex {
    /// Builds the index from `keys` in any order.
    ///
    /// Duplicate keys are collapsed. Returns [`FilterError::InvalidArgument`]
    /// if any key is empty, since it would match everywhere.
    pub fn new<I>(keys: I) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut sorted: Vec<Vec<char>> = Vec::new();
        for key in keys {
            let key = key.as_ref();
            if key.is_empty() {
                return Err(FilterError::InvalidArgument {
                    message: "token keys must be non-empty",
                });
            }
            sorted.push(key.chars().collect());
        }
        sorted.sort_unstable();
        sorted.dedup();

        let mut nodes = Vec::with_capacity(sorted.len() * 2 + 1);
        if sorted.is_empty() {
            nodes.push(Node {
                fragment: Box::default(),
                children: Vec::new(),
                key: None,
            });
        } else {
            build_node(&mut nodes, &sorted, 0, sorted.len(), 0, Vec::new());
        }

        let key_lens = sorted.iter().map(Vec::len).collect();
        let keys = sorted.into_iter().map(|k| k.into_iter().collect()).collect();

        Ok(Self {
            nodes,
            keys,
            key_lens,
        })
    }

    /// Returns the longest key that `window` starts with, if any.
    ///
    /// A window shorter than a key never matches it.
    pub fn start_of(&self, window: &[char]) -> Option<KeyMatch<'_>> {
        let mut node = &self.nodes[ROOT];
        let mut consumed = 0;
        let mut found = None;

        loop {
            let end = consumed + node.fragment.len();
            if window.len() < end || window[consumed..end] != *node.fragment {
                break;
            }
            consumed = end;

            if node.key.is_some() {
                found = node.key;
            }

            let Some(&next) = window.get(consumed) else {
                break;
            };
            match node
                .children
                .binary_search_by_key(&next, |&child| self.nodes[child].fragment[0])
            {
                Ok(i) => node = &self.nodes[node.children[i]],
                Err(_) => break,
            }
        }

        found.map(|id| KeyMatch {
            id,
            key: &self.keys[id],
            char_len: self.key_lens[id],
        })
    }

    /// Convenience wrapper around [`start_of`](Self::start_of) for string windows.
    pub fn start_of_str(&self, window: &str) -> Option<&str> {
        let window: Vec<char> = window.chars().collect();
        self.start_of(&window).map(|m| m.key)
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the key with the given id.
    pub fn key(&self, id: usize) -> Option<&str> {
        self.keys.get(id).map(String::as_str)
    }

    /// Returns the sorted keys.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    /// Returns the length in chars of the longest key (0 when empty).
    pub fn max_key_len(&self) -> usize {
        self.key_lens.iter().copied().max().unwrap_or(0)
    }

    /// Returns the number of tree nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: usize, level: usize) -> fmt::Result {
        let node = &self.nodes[id];
        let fragment: String = node.fragment.iter().collect();
        writeln!(
            f,
            "{:indent$}Node[value: <{}>, #children: {}]",
            "",
            fragment,
            node.children.len(),
            indent = level
        )?;
        for &child in &node.children {
            self.fmt_node(f, child, level + 2)?;
        }
        Ok(())
    }
}

/// Allocates the node for `keys[lo..hi]`, which share their first `offset`
/// chars, and returns its id.
///
/// The node's fragment is first extended while every key in the run agrees
/// on the next char and none ends, which yields the compressed tree directly.
fn build_node(
    nodes: &mut Vec<Node>,
    keys: &[Vec<char>],
    lo: usize,
    hi: usize,
    mut offset: usize,
    mut fragment: Vec<char>,
) -> usize {
    // Sorted order puts a key equal to the shared prefix first.
    while keys[lo].len() > offset {
        let ch = keys[lo][offset];
        if keys[hi - 1][offset] != ch {
            break;
        }
        fragment.push(ch);
        offset += 1;
    }

    let id = nodes.len();
    nodes.push(Node {
        fragment: fragment.into_boxed_slice(),
        children: Vec::new(),
        key: None,
    });

    let mut i = lo;
    if keys[i].len() == offset {
        nodes[id].key = Some(i);
        i += 1;
    }

    while i < hi {
        let ch = keys[i][offset];
        let mut j = i + 1;
        while j < hi && keys[j][offset] == ch {
            j += 1;
        }
        let child = build_node(nodes, keys, i, j, offset + 1, vec![ch]);
        nodes[id].children.push(child);
        i = j;
    }

    id
}

impl fmt::Display for PrefixMatchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, ROOT, 0)
    }
}
