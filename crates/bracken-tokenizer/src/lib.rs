//! Splits a document into text runs and bracket tokens.

mod cursor;
mod table;

use bracken_ast::{BracketCache, Category, CategorySet, Node};
use bracken_length::{Length, LineMap};
use cursor::Cursor;
pub use table::BracketTable;
use table::Role;
use text_size::{TextRange, TextSize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    OpeningBracket(Category),
    ClosingBracket(Category),
}

#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub length: Length,
    pub range: TextRange,
    /// The token's own category, empty for text.
    pub categories: CategorySet,
    /// The leaf for this token: a text node or an interned bracket.
    pub node: Node,
}

/// Tokenizer over one document.
///
/// Text tokens stop after every line break and before every bracket, so no text leaf spans
/// more than one line.
pub struct Tokenizer<'a> {
    text: &'a str,
    table: &'a BracketTable,
    cache: &'a mut BracketCache,
    lines: LineMap,
    current: Option<Token>,
    /// Position of `current`, or of the end of the document.
    position: Length,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str, table: &'a BracketTable, cache: &'a mut BracketCache) -> Self {
        let mut tokenizer = Self {
            text,
            table,
            cache,
            lines: LineMap::new(text),
            current: None,
            position: Length::ZERO,
        };
        tokenizer.current = tokenizer.scan_at(TextSize::new(0));
        tokenizer
    }

    pub fn table(&self) -> &'a BracketTable {
        self.table
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Position of the next token.
    pub fn offset(&self) -> Length {
        self.position
    }

    pub fn read(&mut self) -> Option<Token> {
        let token = self.current.take()?;
        self.position += token.length;
        self.current = self.scan_at(token.range.end());
        Some(token)
    }

    /// Moves forward by `length` and continues scanning from there, even if that is inside
    /// what used to be a token.
    ///
    /// # Panics
    ///
    /// Panics if the target lies outside the document.
    #[track_caller]
    pub fn skip(&mut self, length: Length) {
        let target = self.position + length;
        let offset = self
            .lines
            .offset(target)
            .unwrap_or_else(|| panic!("cannot skip to {target}: outside of the document"));
        self.position = target;
        self.current = self.scan_at(offset);
    }

    fn scan_at(&mut self, start: TextSize) -> Option<Token> {
        let rest = &self.text[usize::from(start)..];
        if rest.is_empty() {
            return None;
        }

        if let Some((role, len)) = self.table.match_at(rest) {
            let length = Length::new(0, len as u32);
            let (kind, category) = match role {
                Role::Opening(category) => (TokenKind::OpeningBracket(category), category),
                Role::Closing(category) => (TokenKind::ClosingBracket(category), category),
            };
            return Some(Token {
                kind,
                length,
                range: TextRange::at(start, TextSize::new(len as u32)),
                categories: self.table.categories(category),
                node: self.cache.bracket(length),
            });
        }

        let mut cursor = Cursor::new(rest);
        loop {
            if cursor.advance() == '\n' || cursor.is_eof() {
                break;
            }
            if self.table.match_at(cursor.rest()).is_some() {
                break;
            }
        }

        let range = TextRange::at(start, cursor.consumed());
        let length = Length::of_str(&self.text[range]);
        Some(Token {
            kind: TokenKind::Text,
            length,
            range,
            categories: CategorySet::EMPTY,
            node: Node::text(length),
        })
    }
}
