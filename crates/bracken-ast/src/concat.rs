//! Balanced concatenation of subtrees.
//!
//! Lists built here hold two or three children, so appending or prepending a node only touches
//! the edge spine of the taller tree.

use crate::{ListNode, Node};

/// Concatenates nodes of arbitrary list heights into one balanced tree, in order.
///
/// Empty lists contribute nothing and are dropped.
pub fn concat_23_trees(items: Vec<Node>) -> Option<Node> {
    let mut runs = same_height_runs(items).into_iter();

    let mut first = runs.next()?;
    let Some(mut second) = runs.next() else {
        return Some(first);
    };

    for item in runs {
        // Merge the closer pair first to keep the resulting tree shallow.
        if height_diff(&first, &second) <= height_diff(&second, &item) {
            first = concat(first, second);
            second = item;
        } else {
            second = concat(second, item);
        }
    }

    Some(concat(first, second))
}

/// Combines nodes that all share one list height into a tree of 2-3 lists.
pub fn concat_23_trees_of_same_height(
    mut items: Vec<Node>,
    create_immutable_lists: bool,
) -> Option<Node> {
    if items.len() <= 1 {
        return items.pop();
    }

    while items.len() > 3 {
        let len = items.len();
        let mut merged = Vec::with_capacity(len / 2);
        let mut items_iter = items.into_iter();
        for group in 0..len / 2 {
            let first = items_iter.next()?;
            let second = items_iter.next()?;
            // An odd item joins the last group.
            let third = if group * 2 + 3 == len { items_iter.next() } else { None };
            merged.push(ListNode::create23(first, second, third, create_immutable_lists).into());
        }
        items = merged;
    }

    let mut items_iter = items.into_iter();
    let first = items_iter.next()?;
    let second = items_iter.next()?;
    Some(ListNode::create23(first, second, items_iter.next(), create_immutable_lists).into())
}

fn same_height_runs(items: Vec<Node>) -> Vec<Node> {
    let mut runs = Vec::new();
    let mut run: Vec<Node> = Vec::new();

    for item in items {
        if item.as_list().is_some_and(ListNode::is_empty) {
            continue;
        }
        if run.first().is_some_and(|first| first.list_height() != item.list_height()) {
            runs.extend(concat_23_trees_of_same_height(std::mem::take(&mut run), false));
        }
        run.push(item);
    }
    runs.extend(concat_23_trees_of_same_height(run, false));

    runs
}

fn height_diff(left: &Node, right: &Node) -> u32 {
    left.list_height().abs_diff(right.list_height())
}

fn concat(left: Node, right: Node) -> Node {
    match left.list_height().cmp(&right.list_height()) {
        std::cmp::Ordering::Equal => ListNode::create23(left, right, None, false).into(),
        std::cmp::Ordering::Greater => append(left, right),
        std::cmp::Ordering::Less => prepend(right, left),
    }
}

/// Appends `node` to the taller tree `list`.
fn append(mut list: Node, node: Node) -> Node {
    let overflow = {
        let root = list.make_mut_list().expect("the taller node of a concatenation is a list");
        append_to_spine(root, node)
    };

    match overflow {
        Some(sibling) => ListNode::create23(list, sibling, None, false).into(),
        None => list,
    }
}

/// Inserts `node` on the right spine of `list` at the height where it fits. Returns a new
/// sibling of `list` if `list` had to be split.
fn append_to_spine(list: &mut ListNode, node: Node) -> Option<Node> {
    let fitting = if list.height() == node.list_height() + 1 {
        Some(node)
    } else {
        let last =
            list.make_last_element_mutable().expect("a list above the target height has list children");
        append_to_spine(last, node)
    };

    match fitting {
        Some(node) if list.len() >= 3 => {
            let last = list.unappend_child().expect("a full list has a last child");
            Some(ListNode::create23(last, node, None, false).into())
        }
        Some(node) => {
            list.append_child_of_same_height(node);
            None
        }
        None => {
            list.handle_children_changed();
            None
        }
    }
}

/// Prepends `node` to the taller tree `list`.
fn prepend(mut list: Node, node: Node) -> Node {
    let overflow = {
        let root = list.make_mut_list().expect("the taller node of a concatenation is a list");
        prepend_to_spine(root, node)
    };

    match overflow {
        Some(sibling) => ListNode::create23(sibling, list, None, false).into(),
        None => list,
    }
}

fn prepend_to_spine(list: &mut ListNode, node: Node) -> Option<Node> {
    let fitting = if list.height() == node.list_height() + 1 {
        Some(node)
    } else {
        let first = list
            .make_first_element_mutable()
            .expect("a list above the target height has list children");
        prepend_to_spine(first, node)
    };

    match fitting {
        Some(node) if list.len() >= 3 => {
            let first = list.unprepend_child().expect("a full list has a first child");
            Some(ListNode::create23(node, first, None, false).into())
        }
        Some(node) => {
            list.prepend_child_of_same_height(node);
            None
        }
        None => {
            list.handle_children_changed();
            None
        }
    }
}
