//! Longest-match string alternation: `spec.md` §4.7.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::context::ParseContext;
use crate::error::GrammarError;
use crate::result::{Failure, PResult, Success};
use crate::walker::{MapChildren, Walker};
use crate::Parser;

struct TrieNode {
    children: FxHashMap<char, TrieNode>,
    /// Set when some alternative ends exactly at this node.
    word: bool,
}

impl TrieNode {
    fn empty() -> Self {
        TrieNode {
            children: FxHashMap::default(),
            word: false,
        }
    }
}

/// Longest-match alternation over a fixed set of literal strings, via a
/// trie built once at construction time.
///
/// Unlike [`crate::combinator::Either`], whose ordered alternatives use
/// first-match priority, `StringIn` always returns the longest of the
/// configured strings that matches at the current position — there is no
/// ambiguity to resolve, since each prefix path through the trie is unique.
pub struct StringIn {
    root: TrieNode,
    alternatives: Vec<String>,
}

impl StringIn {
    /// Builds a trie over `alternatives`. Panics if the set is empty: an
    /// empty `StringIn` can never succeed and is almost certainly a
    /// grammar-construction mistake rather than an intentional `Fail`.
    pub fn new<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match Self::try_new(alternatives) {
            Ok(trie) => trie,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible counterpart of [`StringIn::new`] for callers building a
    /// grammar from a runtime-assembled (not literal) set of alternatives,
    /// who would rather handle an empty set as a [`GrammarError`] than
    /// panic.
    pub fn try_new<I, S>(alternatives: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alternatives: Vec<String> = alternatives.into_iter().map(Into::into).collect();
        if alternatives.is_empty() {
            return Err(GrammarError::EmptyAlternation);
        }

        let mut root = TrieNode::empty();
        for word in &alternatives {
            let mut node = &mut root;
            for c in word.chars() {
                node = node.children.entry(c).or_insert_with(TrieNode::empty);
            }
            node.word = true;
        }

        Ok(StringIn { root, alternatives })
    }
}

impl MapChildren<String> for StringIn {
    fn map_children<W: Walker>(self: Arc<Self>, _walker: &W) -> Arc<dyn Parser<String>> {
        self
    }
}

impl fmt::Display for StringIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringIn(")?;
        for (i, w) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", w)?;
        }
        write!(f, ")")
    }
}

impl Parser<String> for StringIn {
    fn parse_rec(&self, ctx: &mut ParseContext, index: usize) -> PResult<String> {
        let mut node = &self.root;
        let mut best: Option<usize> = None;
        let mut offset = 0usize;

        for c in ctx.input()[index..].chars() {
            match node.children.get(&c) {
                Some(next) => {
                    offset += c.len_utf8();
                    node = next;
                    if node.word {
                        best = Some(offset);
                    }
                }
                None => break,
            }
        }

        match best {
            Some(len) => Ok(Success::new(ctx.input()[index..index + len].to_string(), index + len)),
            None => Err(Failure::new(index, self.to_string())),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
