use bracken_ast::{
    CategorySet, ListNode, Node, PairNode, UnexpectedClosingBracketNode, concat,
};
use bracken_tokenizer::{Token, TokenKind, Tokenizer};

use crate::ReuseSource;

/// Opening brackets nested deeper than this are treated as text.
pub const MAX_NESTING_DEPTH: u32 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Nodes built from tokens.
    pub items_constructed: usize,
    /// Nodes taken over from the reuse source.
    pub items_from_cache: usize,
}

pub struct Parser<'a, 'r> {
    tokenizer: Tokenizer<'a>,
    reuse: Option<&'r mut dyn ReuseSource>,
    create_immutable_lists: bool,
    stats: ParseStats,
}

impl<'a, 'r> Parser<'a, 'r> {
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        Self { tokenizer, reuse: None, create_immutable_lists: false, stats: ParseStats::default() }
    }

    pub fn with_reuse(mut self, source: &'r mut dyn ReuseSource) -> Self {
        self.reuse = Some(source);
        self
    }

    /// Freezes the lists built from fresh tokens. Has no effect on lists built while
    /// reusing nodes.
    pub fn create_immutable_lists(mut self, create_immutable_lists: bool) -> Self {
        self.create_immutable_lists = create_immutable_lists;
        self
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Parses from the current tokenizer position to the end of the document.
    pub fn parse_document(&mut self) -> Node {
        self.stats = ParseStats::default();

        let opened = CategorySet::EMPTY;
        let root = self
            .parse_list(&opened, 0)
            .unwrap_or_else(|| ListNode::empty(self.create_immutable_lists).into());

        tracing::debug!(
            length = %root.length(),
            items_constructed = self.stats.items_constructed,
            items_from_cache = self.stats.items_from_cache,
            "parsed document"
        );
        root
    }

    fn parse_list(&mut self, opened: &CategorySet, depth: u32) -> Option<Node> {
        let mut items = Vec::new();

        loop {
            let child = match self.try_read_child_from_cache(opened) {
                Some(child) => child,
                None => {
                    let Some(token) = self.next_child_token(opened) else {
                        break;
                    };
                    self.parse_child(token, opened, depth)
                }
            };

            if child.as_list().is_some_and(ListNode::is_empty) {
                continue;
            }
            items.push(child);
        }

        if self.reuse.is_some() {
            concat::concat_23_trees(items)
        } else {
            concat::concat_23_trees_of_same_height(items, self.create_immutable_lists)
        }
    }

    fn try_read_child_from_cache(&mut self, opened: &CategorySet) -> Option<Node> {
        let source = self.reuse.as_deref_mut()?;
        let offset = self.tokenizer.offset();

        let node = source.read_reusable(offset, &mut |node: &Node, end_line_did_change: bool| {
            node.can_be_reused(opened, end_line_did_change)
        })?;

        tracing::trace!(%offset, length = %node.length(), kind = ?node.kind(), "reused node");
        self.stats.items_from_cache += 1;
        self.tokenizer.skip(node.length());
        Some(node)
    }

    /// Reads the next token unless the document ends or the token closes an enclosing pair.
    fn next_child_token(&mut self, opened: &CategorySet) -> Option<Token> {
        let token = self.tokenizer.peek()?;
        if matches!(token.kind, TokenKind::ClosingBracket(_)) && token.categories.intersects(opened)
        {
            return None;
        }
        self.tokenizer.read()
    }

    fn parse_child(&mut self, token: Token, opened: &CategorySet, depth: u32) -> Node {
        self.stats.items_constructed += 1;

        match token.kind {
            TokenKind::Text => token.node,
            TokenKind::ClosingBracket(category) => {
                let key = self.tokenizer.table().key(category);
                UnexpectedClosingBracketNode::with_key(category, key, token.length).into()
            }
            TokenKind::OpeningBracket(_) if depth >= MAX_NESTING_DEPTH => Node::text(token.length),
            TokenKind::OpeningBracket(category) => {
                let content = self.parse_list(&opened.merge(&token.categories), depth + 1);

                let closes = self
                    .tokenizer
                    .peek()
                    .is_some_and(|next| next.kind == TokenKind::ClosingBracket(category));
                let closing = if closes { self.tokenizer.read().map(|token| token.node) } else { None };

                PairNode::create(category, token.node, content, closing).into()
            }
        }
    }
}
