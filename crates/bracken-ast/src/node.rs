use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use bracken_length::Length;

use crate::{Category, CategorySet, DenseKeys, ListNode};

static NO_CATEGORIES: CategorySet = CategorySet::EMPTY;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Bracket,
    UnexpectedClosingBracket,
    Pair,
    List,
}

/// A node of the bracket pair tree.
#[derive(Clone, Debug)]
pub enum AstNode {
    Text(TextNode),
    Bracket(BracketNode),
    UnexpectedClosingBracket(UnexpectedClosingBracketNode),
    Pair(PairNode),
    List(ListNode),
}

impl AstNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Text(_) => NodeKind::Text,
            Self::Bracket(_) => NodeKind::Bracket,
            Self::UnexpectedClosingBracket(_) => NodeKind::UnexpectedClosingBracket,
            Self::Pair(_) => NodeKind::Pair,
            Self::List(_) => NodeKind::List,
        }
    }

    pub fn length(&self) -> Length {
        match self {
            Self::Text(text) => text.length,
            Self::Bracket(bracket) => bracket.length,
            Self::UnexpectedClosingBracket(closer) => closer.length,
            Self::Pair(pair) => pair.length,
            Self::List(list) => list.length(),
        }
    }

    /// Level in the balanced aggregation. Zero for everything but non-empty lists.
    pub fn list_height(&self) -> u32 {
        match self {
            Self::List(list) => list.height(),
            _ => 0,
        }
    }

    /// Closing bracket categories in this subtree that have no opener inside it.
    pub fn unopened_brackets(&self) -> &CategorySet {
        match self {
            Self::Text(_) | Self::Bracket(_) => &NO_CATEGORIES,
            Self::UnexpectedClosingBracket(closer) => &closer.unopened,
            Self::Pair(pair) => &pair.unopened,
            Self::List(list) => list.unopened_brackets(),
        }
    }

    pub fn children_len(&self) -> usize {
        match self {
            Self::Text(_) | Self::Bracket(_) | Self::UnexpectedClosingBracket(_) => 0,
            Self::Pair(_) => 3,
            Self::List(list) => list.len(),
        }
    }

    /// Returns the child in slot `index`.
    ///
    /// Pairs always have three slots: opening bracket, content and closing bracket, the last
    /// two of which may be empty.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a slot of a pair.
    #[track_caller]
    pub fn child(&self, index: usize) -> Option<&Node> {
        match self {
            Self::Text(_) | Self::Bracket(_) | Self::UnexpectedClosingBracket(_) => None,
            Self::Pair(pair) => match index {
                0 => Some(&pair.opening),
                1 => pair.content.as_ref(),
                2 => pair.closing.as_ref(),
                _ => panic!("invalid child index {index} for a pair"),
            },
            Self::List(list) => list.children().get(index),
        }
    }

    /// Iterates over the present children, skipping empty pair slots.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        (0..self.children_len()).filter_map(move |index| self.child(index))
    }

    /// Tells whether this subtree, taken from a previous parse, can be spliced unchanged into
    /// a context that expects any of `expected_closing` to close it.
    pub fn can_be_reused(&self, expected_closing: &CategorySet, end_line_did_change: bool) -> bool {
        match self {
            // A bracket on the edited line may have grown into or out of this text.
            Self::Text(_) => !end_line_did_change,
            Self::Bracket(_) => false,
            Self::UnexpectedClosingBracket(closer) => !expected_closing.intersects(&closer.unopened),
            Self::Pair(pair) => pair.can_be_reused(expected_closing),
            Self::List(list) => list.can_be_reused(expected_closing, end_line_did_change),
        }
    }

    pub fn as_pair(&self) -> Option<&PairNode> {
        match self {
            Self::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Shared handle to an [`AstNode`].
#[derive(Clone)]
pub struct Node(Arc<AstNode>);

impl Node {
    pub(crate) fn new(node: AstNode) -> Self {
        Self(Arc::new(node))
    }

    pub fn text(length: Length) -> Self {
        Self::new(AstNode::Text(TextNode { length }))
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    /// Returns a mutable envelope for an immutable list, and this very node otherwise.
    pub fn to_mutable(&self) -> Self {
        match &*self.0 {
            AstNode::List(list) if list.is_immutable() => AstNode::List(list.to_mutable()).into(),
            _ => self.clone(),
        }
    }

    /// Copies every pair and list of the subtree.
    ///
    /// Leaves are immutable and stay shared, which keeps bracket leaves interned.
    pub fn deep_clone(&self) -> Self {
        match &*self.0 {
            AstNode::Text(_) | AstNode::Bracket(_) | AstNode::UnexpectedClosingBracket(_) => {
                self.clone()
            }
            AstNode::Pair(pair) => PairNode::create(
                pair.category,
                pair.opening.deep_clone(),
                pair.content.as_ref().map(Self::deep_clone),
                pair.closing.as_ref().map(Self::deep_clone),
            )
            .into(),
            AstNode::List(list) => {
                ListNode::create(list.children().iter().map(Self::deep_clone).collect(), false)
                    .into()
            }
        }
    }

    /// Inlines nested lists so that no list has a list child. Meant for inspection only: the
    /// result is no longer balanced.
    pub fn flatten_lists(&self) -> Self {
        match &*self.0 {
            AstNode::Text(_) | AstNode::Bracket(_) | AstNode::UnexpectedClosingBracket(_) => {
                self.clone()
            }
            AstNode::Pair(pair) => PairNode::create(
                pair.category,
                pair.opening.flatten_lists(),
                pair.content.as_ref().map(Self::flatten_lists),
                pair.closing.as_ref().map(Self::flatten_lists),
            )
            .into(),
            AstNode::List(list) => {
                let mut items = Vec::with_capacity(list.len());
                for child in list.children() {
                    let flat = child.flatten_lists();
                    match &*flat {
                        AstNode::List(inner) => items.extend(inner.children().iter().cloned()),
                        _ => items.push(flat),
                    }
                }
                ListNode::create(items, false).into()
            }
        }
    }

    /// Gives mutable access to this node if it is a list, copying the list envelope first
    /// when the node is shared.
    ///
    /// A frozen list stays frozen and rejects every mutation. Use [`Node::to_mutable`] to
    /// get a list that accepts them.
    pub fn as_list_mut(&mut self) -> Option<&mut ListNode> {
        self.as_list()?;
        match Arc::make_mut(&mut self.0) {
            AstNode::List(list) => Some(list),
            _ => None,
        }
    }

    /// Like [`Node::as_list_mut`], but thaws a frozen list first.
    pub(crate) fn make_mut_list(&mut self) -> Option<&mut ListNode> {
        if self.as_list()?.is_immutable() {
            *self = self.to_mutable();
        }
        self.as_list_mut()
    }
}

impl Deref for Node {
    type Target = AstNode;

    fn deref(&self) -> &AstNode {
        &self.0
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl From<AstNode> for Node {
    fn from(node: AstNode) -> Self {
        Self::new(node)
    }
}

impl From<PairNode> for Node {
    fn from(pair: PairNode) -> Self {
        Self::new(AstNode::Pair(pair))
    }
}

impl From<ListNode> for Node {
    fn from(list: ListNode) -> Self {
        Self::new(AstNode::List(list))
    }
}

impl From<UnexpectedClosingBracketNode> for Node {
    fn from(closer: UnexpectedClosingBracketNode) -> Self {
        Self::new(AstNode::UnexpectedClosingBracket(closer))
    }
}

/// A run of text without brackets.
#[derive(Clone, Debug)]
pub struct TextNode {
    length: Length,
}

/// A single bracket token. Only handed out by [`BracketCache`](crate::BracketCache).
#[derive(Clone, Debug)]
pub struct BracketNode {
    pub(crate) length: Length,
}

/// A closing bracket without a matching opener in scope.
#[derive(Clone, Debug)]
pub struct UnexpectedClosingBracketNode {
    category: Category,
    length: Length,
    unopened: CategorySet,
}

impl UnexpectedClosingBracketNode {
    pub fn new(category: Category, length: Length, keys: &mut DenseKeys<Category>) -> Self {
        Self::with_key(category, keys.key(category), length)
    }

    /// Like [`UnexpectedClosingBracketNode::new`], with the dense key of `category` known.
    pub fn with_key(category: Category, key: u32, length: Length) -> Self {
        Self { category, length, unopened: CategorySet::singleton(key) }
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// An opening bracket, its content and its closing bracket, if the pair is closed.
#[derive(Clone, Debug)]
pub struct PairNode {
    category: Category,
    opening: Node,
    content: Option<Node>,
    closing: Option<Node>,
    length: Length,
    unopened: CategorySet,
}

impl PairNode {
    pub fn create(
        category: Category,
        opening: Node,
        content: Option<Node>,
        closing: Option<Node>,
    ) -> Self {
        debug_assert_eq!(opening.kind(), NodeKind::Bracket);

        let mut length = opening.length();
        if let Some(content) = &content {
            length += content.length();
        }
        if let Some(closing) = &closing {
            length += closing.length();
        }
        let unopened =
            content.as_ref().map_or(CategorySet::EMPTY, |content| content.unopened_brackets().clone());

        Self { category, opening, content, closing, length, unopened }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn opening_bracket(&self) -> &Node {
        &self.opening
    }

    pub fn content(&self) -> Option<&Node> {
        self.content.as_ref()
    }

    pub fn closing_bracket(&self) -> Option<&Node> {
        self.closing.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closing.is_some()
    }

    fn can_be_reused(&self, expected_closing: &CategorySet) -> bool {
        // Where an unclosed pair ends depends on text after it.
        if self.closing.is_none() {
            return false;
        }

        !expected_closing.intersects(&self.unopened)
    }
}
