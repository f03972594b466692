use bracken_length::Length;

use crate::Node;

/// Walks a tree in document order, handing out the longest nodes that start at given offsets.
#[derive(Debug)]
pub struct NodeReader {
    /// Node stack from the root down to the node at the reader position.
    next_nodes: Vec<Node>,
    offsets: Vec<Length>,
    /// Child index of each stack entry below the root within its parent.
    indices: Vec<usize>,
    last_offset: Length,
}

impl NodeReader {
    pub fn new(root: Node) -> Self {
        Self {
            next_nodes: vec![root],
            offsets: vec![Length::ZERO],
            indices: Vec::new(),
            last_offset: Length::ZERO,
        }
    }

    /// Returns the longest node that starts at `offset` and satisfies `predicate`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is smaller than the offset of the previous call.
    #[track_caller]
    pub fn read_longest_node_at(
        &mut self,
        offset: Length,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<Node> {
        assert!(offset >= self.last_offset, "node reader offsets must not decrease");
        self.last_offset = offset;

        loop {
            let current = self.next_nodes.last()?.clone();
            let current_offset = *self.offsets.last()?;

            if offset < current_offset {
                // Nothing starts here.
                return None;
            }

            if current_offset < offset {
                if current_offset + current.length() <= offset {
                    self.next_node_after_current();
                } else {
                    match next_child_index(&current, None) {
                        Some(index) => self.descend(&current, index, current_offset),
                        None => self.next_node_after_current(),
                    }
                }
                continue;
            }

            if predicate(&current) {
                self.next_node_after_current();
                return Some(current);
            }

            match next_child_index(&current, None) {
                Some(index) => self.descend(&current, index, current_offset),
                None => {
                    self.next_node_after_current();
                    return None;
                }
            }
        }
    }

    fn descend(&mut self, parent: &Node, index: usize, offset: Length) {
        let child = parent.child(index).cloned().expect("index of a present child");
        self.next_nodes.push(child);
        self.offsets.push(offset);
        self.indices.push(index);
    }

    fn next_node_after_current(&mut self) {
        loop {
            let (Some(node), Some(offset)) = (self.next_nodes.pop(), self.offsets.pop()) else {
                return;
            };
            let Some(&index) = self.indices.last() else {
                return;
            };

            let parent = self.next_nodes.last().expect("non-root nodes have a parent");
            match next_child_index(parent, Some(index)) {
                Some(next) => {
                    let sibling = parent.child(next).cloned().expect("index of a present child");
                    self.next_nodes.push(sibling);
                    self.offsets.push(offset + node.length());
                    if let Some(last) = self.indices.last_mut() {
                        *last = next;
                    }
                    return;
                }
                None => {
                    self.indices.pop();
                }
            }
        }
    }
}

fn next_child_index(node: &Node, after: Option<usize>) -> Option<usize> {
    let start = after.map_or(0, |index| index + 1);
    (start..node.children_len()).find(|&index| node.child(index).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BracketCache, Category, CategorySet, ListNode, NodeKind, PairNode};

    fn text(columns: u32) -> Node {
        Node::text(Length::new(0, columns))
    }

    /// `ab(cd)ef` with `(cd)` as a closed pair.
    fn tree(cache: &mut BracketCache) -> (Node, Node) {
        let pair: Node = PairNode::create(
            Category(0),
            cache.bracket(Length::new(0, 1)),
            Some(text(2)),
            Some(cache.bracket(Length::new(0, 1))),
        )
        .into();
        let root = ListNode::create(vec![text(2), pair.clone(), text(2)], true).into();
        (root, pair)
    }

    #[test]
    fn whole_tree_is_returned_when_accepted() {
        let mut cache = BracketCache::new();
        let (root, _) = tree(&mut cache);
        let mut reader = NodeReader::new(root.clone());

        let read = reader.read_longest_node_at(Length::ZERO, |_| true);
        assert!(read.is_some_and(|node| Node::ptr_eq(&node, &root)));
        assert!(reader.read_longest_node_at(Length::new(0, 8), |_| true).is_none());
    }

    #[test]
    fn rejected_nodes_are_descended_into() {
        let mut cache = BracketCache::new();
        let (root, pair) = tree(&mut cache);
        let mut reader = NodeReader::new(root);

        let reusable = |node: &Node| {
            node.kind() != NodeKind::List && node.can_be_reused(&CategorySet::EMPTY, false)
        };

        let first = reader.read_longest_node_at(Length::ZERO, reusable);
        assert_eq!(first.map(|node| node.length()), Some(Length::new(0, 2)));

        let second = reader.read_longest_node_at(Length::new(0, 2), reusable);
        assert!(second.is_some_and(|node| Node::ptr_eq(&node, &pair)));

        let third = reader.read_longest_node_at(Length::new(0, 6), reusable);
        assert_eq!(third.map(|node| node.kind()), Some(NodeKind::Text));
    }

    #[test]
    fn offsets_inside_nodes_find_nested_starts() {
        let mut cache = BracketCache::new();
        let (root, _) = tree(&mut cache);
        let mut reader = NodeReader::new(root);

        let is_text = |node: &Node| node.kind() == NodeKind::Text;

        let content = reader.read_longest_node_at(Length::new(0, 3), is_text);
        assert_eq!(content.map(|node| node.length()), Some(Length::new(0, 2)));

        // The closing bracket is a bracket leaf, which the predicate rejects.
        assert!(reader.read_longest_node_at(Length::new(0, 5), is_text).is_none());
        assert!(reader.read_longest_node_at(Length::new(0, 7), |_| true).is_none());
    }

    #[test]
    fn missing_pair_slots_are_skipped() {
        let mut cache = BracketCache::new();
        let empty_pair: Node = PairNode::create(
            Category(0),
            cache.bracket(Length::new(0, 1)),
            None,
            Some(cache.bracket(Length::new(0, 1))),
        )
        .into();
        let root: Node = ListNode::create(vec![empty_pair, text(3)], false).into();
        let mut reader = NodeReader::new(root);

        let closing =
            reader.read_longest_node_at(Length::new(0, 1), |node| node.kind() == NodeKind::Bracket);
        assert_eq!(closing.map(|node| node.kind()), Some(NodeKind::Bracket));

        let after =
            reader.read_longest_node_at(Length::new(0, 2), |node| node.kind() == NodeKind::Text);
        assert_eq!(after.map(|node| node.length()), Some(Length::new(0, 3)));
    }

    #[test]
    #[should_panic(expected = "node reader offsets must not decrease")]
    fn decreasing_offsets_panic() {
        let mut cache = BracketCache::new();
        let (root, _) = tree(&mut cache);
        let mut reader = NodeReader::new(root);
        let _ = reader.read_longest_node_at(Length::new(0, 4), |_| false);
        let _ = reader.read_longest_node_at(Length::new(0, 1), |_| false);
    }
}
