use bracken_length::Length;
use thiserror::Error;

use crate::{AstNode, CategorySet, Node};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("instance is immutable")]
    Immutable,
    #[error("child of list height {found} does not fit a list of height {expected}")]
    HeightMismatch { expected: u32, found: u32 },
}

/// A sequence of children that all have the same list height.
///
/// Lists are mutable while a tree is being assembled. An immutable list rejects every
/// mutation and has to be copied with [`ListNode::to_mutable`] first, which keeps subtrees
/// shared with an older tree intact.
#[derive(Clone, Debug)]
pub struct ListNode {
    children: Vec<Node>,
    height: u32,
    length: Length,
    unopened: CategorySet,
    immutable: bool,
}

impl ListNode {
    pub fn empty(immutable: bool) -> Self {
        Self {
            children: Vec::new(),
            height: 0,
            length: Length::ZERO,
            unopened: CategorySet::EMPTY,
            immutable,
        }
    }

    /// # Panics
    ///
    /// Panics if the items do not all have the same list height.
    #[track_caller]
    pub fn create(items: Vec<Node>, immutable: bool) -> Self {
        let Some(first) = items.first() else {
            return Self::empty(immutable);
        };
        let child_height = first.list_height();
        assert!(
            items.iter().all(|item| item.list_height() == child_height),
            "list children must share one list height"
        );

        let mut list = Self { children: items, ..Self::empty(immutable) };
        list.recompute();
        list
    }

    #[track_caller]
    pub fn create23(first: Node, second: Node, third: Option<Node>, immutable: bool) -> Self {
        let mut items = Vec::with_capacity(3);
        items.push(first);
        items.push(second);
        items.extend(third);
        Self::create(items, immutable)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn length(&self) -> Length {
        self.length
    }

    pub fn unopened_brackets(&self) -> &CategorySet {
        &self.unopened
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Copies the envelope of this list. Children stay shared.
    pub fn to_mutable(&self) -> Self {
        Self { immutable: false, ..self.clone() }
    }

    pub fn into_immutable(self) -> Self {
        Self { immutable: true, ..self }
    }

    pub fn try_append_child_of_same_height(&mut self, node: Node) -> Result<(), ListError> {
        self.check_mutable()?;
        self.check_child_height(&node)?;
        self.children.push(node);
        self.recompute();
        Ok(())
    }

    pub fn try_prepend_child_of_same_height(&mut self, node: Node) -> Result<(), ListError> {
        self.check_mutable()?;
        self.check_child_height(&node)?;
        self.children.insert(0, node);
        self.recompute();
        Ok(())
    }

    pub fn try_unappend_child(&mut self) -> Result<Option<Node>, ListError> {
        self.check_mutable()?;
        let child = self.children.pop();
        self.recompute();
        Ok(child)
    }

    pub fn try_unprepend_child(&mut self) -> Result<Option<Node>, ListError> {
        self.check_mutable()?;
        if self.children.is_empty() {
            return Ok(None);
        }
        let child = self.children.remove(0);
        self.recompute();
        Ok(Some(child))
    }

    #[track_caller]
    pub fn append_child_of_same_height(&mut self, node: Node) {
        if let Err(err) = self.try_append_child_of_same_height(node) {
            panic!("{err}");
        }
    }

    #[track_caller]
    pub fn prepend_child_of_same_height(&mut self, node: Node) {
        if let Err(err) = self.try_prepend_child_of_same_height(node) {
            panic!("{err}");
        }
    }

    #[track_caller]
    pub fn unappend_child(&mut self) -> Option<Node> {
        self.try_unappend_child().unwrap_or_else(|err| panic!("{err}"))
    }

    #[track_caller]
    pub fn unprepend_child(&mut self) -> Option<Node> {
        self.try_unprepend_child().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the first child as a mutable list, replacing it by a private copy first if it
    /// is immutable or shared. Returns `None` if there is no first child or it is not a list.
    #[track_caller]
    pub fn make_first_element_mutable(&mut self) -> Option<&mut Self> {
        self.assert_mutable();
        self.children.first_mut()?.make_mut_list()
    }

    /// The mirror image of [`ListNode::make_first_element_mutable`].
    #[track_caller]
    pub fn make_last_element_mutable(&mut self) -> Option<&mut Self> {
        self.assert_mutable();
        self.children.last_mut()?.make_mut_list()
    }

    /// Recomputes aggregates after a child was changed in place.
    #[track_caller]
    pub fn handle_children_changed(&mut self) {
        self.assert_mutable();
        self.recompute();
    }

    pub(crate) fn can_be_reused(&self, expected_closing: &CategorySet, end_line_did_change: bool) -> bool {
        let Some(mut frontier) = self.children.last() else {
            return true;
        };
        if expected_closing.intersects(&self.unopened) {
            return false;
        }

        // Only the right edge decides what may follow the reused subtree.
        while let AstNode::List(list) = &**frontier {
            match list.children.last() {
                Some(last) => frontier = last,
                None => break,
            }
        }

        frontier.can_be_reused(expected_closing, end_line_did_change)
    }

    fn recompute(&mut self) {
        self.height = self.children.first().map_or(0, |first| first.list_height() + 1);
        self.length = self.children.iter().map(|child| child.length()).sum();
        self.unopened = self
            .children
            .iter()
            .fold(CategorySet::EMPTY, |set, child| set.merge(child.unopened_brackets()));
    }

    fn check_mutable(&self) -> Result<(), ListError> {
        if self.immutable { Err(ListError::Immutable) } else { Ok(()) }
    }

    #[track_caller]
    fn assert_mutable(&self) {
        if let Err(err) = self.check_mutable() {
            panic!("{err}");
        }
    }

    fn check_child_height(&self, node: &Node) -> Result<(), ListError> {
        if self.children.is_empty() {
            return Ok(());
        }

        let expected = self.height - 1;
        let found = node.list_height();
        if found == expected { Ok(()) } else { Err(ListError::HeightMismatch { expected, found }) }
    }
}
