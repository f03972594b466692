use bracken_length::Length;
use rustc_hash::FxHashMap;

use crate::{AstNode, BracketNode, Node};

/// Interns bracket leaves by length, so that e.g. every `(` of a document is one node.
///
/// Entries are never evicted: a document only has a handful of distinct bracket lengths.
#[derive(Debug, Default)]
pub struct BracketCache {
    brackets: FxHashMap<Length, Node>,
}

impl BracketCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bracket(&mut self, length: Length) -> Node {
        self.brackets
            .entry(length)
            .or_insert_with(|| Node::new(AstNode::Bracket(BracketNode { length })))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}
