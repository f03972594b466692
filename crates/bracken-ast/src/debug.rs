use std::fmt;

use crate::{AstNode, Node};

/// Renders a tree one node per line, indented by depth.
pub struct DebugTree<'a>(pub &'a Node);

impl fmt::Display for DebugTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.0, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    let indent = depth * 2;
    write!(f, "{:indent$}", "")?;

    match &**node {
        AstNode::Text(_) => writeln!(f, "Text {}", node.length()),
        AstNode::Bracket(_) => writeln!(f, "Bracket {}", node.length()),
        AstNode::UnexpectedClosingBracket(closer) => {
            writeln!(f, "UnexpectedClosingBracket {} category={}", node.length(), closer.category())
        }
        AstNode::Pair(pair) => {
            write!(f, "Pair {} category={}", node.length(), pair.category())?;
            write_unopened(f, node)?;
            writeln!(f)?;

            write_node(f, pair.opening_bracket(), depth + 1)?;
            if let Some(content) = pair.content() {
                write_node(f, content, depth + 1)?;
            }
            match pair.closing_bracket() {
                Some(closing) => write_node(f, closing, depth + 1),
                None => writeln!(f, "{:indent$}<unclosed>", "", indent = indent + 2),
            }
        }
        AstNode::List(list) => {
            write!(f, "List {} height={}", node.length(), list.height())?;
            if list.is_immutable() {
                write!(f, " frozen")?;
            }
            write_unopened(f, node)?;
            writeln!(f)?;

            list.children().iter().try_for_each(|child| write_node(f, child, depth + 1))
        }
    }
}

fn write_unopened(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    let unopened = node.unopened_brackets();
    if unopened.is_empty() { Ok(()) } else { write!(f, " unopened={unopened:?}") }
}
