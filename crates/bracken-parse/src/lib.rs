mod parser;

use bracken_ast::{BracketCache, Node, NodeReader};
use bracken_length::Length;
pub use bracken_tokenizer::{BracketTable, Tokenizer};
pub use parser::{MAX_NESTING_DEPTH, ParseStats, Parser};

/// Hands out subtrees of a previous parse that may be spliced into the current one.
///
/// Implementations map offsets of the new document to the old tree and decide, per offered
/// node, whether the line its right edge ends on was touched by an edit.
pub trait ReuseSource {
    /// Returns the longest old node starting at `offset` (in the new document) for which
    /// `accept(node, end_line_did_change)` holds.
    ///
    /// The parser asks for non-decreasing offsets.
    fn read_reusable(
        &mut self,
        offset: Length,
        accept: &mut dyn FnMut(&Node, bool) -> bool,
    ) -> Option<Node>;
}

/// Reuse source for a document that did not change since `root` was parsed.
impl ReuseSource for NodeReader {
    fn read_reusable(
        &mut self,
        offset: Length,
        accept: &mut dyn FnMut(&Node, bool) -> bool,
    ) -> Option<Node> {
        self.read_longest_node_at(offset, |node| accept(node, false))
    }
}

pub fn parse(text: &str, table: &BracketTable, cache: &mut BracketCache) -> Node {
    Parser::new(Tokenizer::new(text, table, cache)).parse_document()
}
