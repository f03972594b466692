//! Incremental tree of bracket pairs.
//!
//! Nodes are shared between successive parses of a document. A subtree of the previous tree
//! can be spliced into the next one as long as [`AstNode::can_be_reused`] agrees, which only
//! looks at the node's aggregates and its right edge instead of rescanning its text.

mod cache;
mod category_set;
/// Balanced concatenation of subtrees.
pub mod concat;
mod debug;
mod list;
mod node;
mod reader;
mod walk;

/// Intern pool for bracket leaves.
pub use cache::BracketCache;
/// Bracket categories and the sets tracking them.
pub use category_set::{Category, CategorySet, DenseKeys};
pub use debug::DebugTree;
pub use list::{ListError, ListNode};
/// The node model.
pub use node::{
    AstNode, BracketNode, Node, NodeKind, PairNode, TextNode, UnexpectedClosingBracketNode,
};
pub use reader::NodeReader;
pub use walk::{BracketInfo, BracketKind, brackets};
