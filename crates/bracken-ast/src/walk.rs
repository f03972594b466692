use bracken_length::Length;

use crate::{AstNode, Category, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BracketKind {
    Opening { closed: bool },
    Closing,
    Unexpected,
}

/// A bracket located in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketInfo {
    pub kind: BracketKind,
    pub category: Category,
    pub start: Length,
    pub end: Length,
    /// Number of pairs enclosing the bracket.
    pub level: u32,
}

/// Lists every bracket under `root` in document order.
pub fn brackets(root: &Node) -> Vec<BracketInfo> {
    let mut out = Vec::new();
    collect(root, Length::ZERO, 0, &mut out);
    out
}

fn collect(node: &Node, start: Length, level: u32, out: &mut Vec<BracketInfo>) -> Length {
    let end = start + node.length();

    match &**node {
        AstNode::Text(_) | AstNode::Bracket(_) => {}
        AstNode::UnexpectedClosingBracket(invalid) => out.push(BracketInfo {
            kind: BracketKind::Unexpected,
            category: invalid.category(),
            start,
            end,
            level,
        }),
        AstNode::Pair(pair) => {
            let opening_end = start + pair.opening_bracket().length();
            out.push(BracketInfo {
                kind: BracketKind::Opening { closed: pair.is_closed() },
                category: pair.category(),
                start,
                end: opening_end,
                level,
            });

            let content_end = match pair.content() {
                Some(content) => collect(content, opening_end, level + 1, out),
                None => opening_end,
            };

            if pair.is_closed() {
                out.push(BracketInfo {
                    kind: BracketKind::Closing,
                    category: pair.category(),
                    start: content_end,
                    end,
                    level,
                });
            }
        }
        AstNode::List(list) => {
            let mut offset = start;
            for child in list.children() {
                offset = collect(child, offset, level, out);
            }
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BracketCache, DenseKeys, ListNode, PairNode, UnexpectedClosingBracketNode};

    #[test]
    fn positions_and_levels() {
        let mut cache = BracketCache::new();
        let mut keys = DenseKeys::new();
        let bracket = cache.bracket(Length::new(0, 1));

        // `a(\n[x])]` where the last `]` is unexpected.
        let inner: Node = PairNode::create(
            Category(1),
            bracket.clone(),
            Some(Node::text(Length::new(0, 1))),
            Some(bracket.clone()),
        )
        .into();
        let content: Node = ListNode::create(vec![Node::text(Length::new(1, 0)), inner], false).into();
        let outer: Node =
            PairNode::create(Category(0), bracket.clone(), Some(content), Some(bracket)).into();
        let invalid =
            UnexpectedClosingBracketNode::new(Category(1), Length::new(0, 1), &mut keys).into();
        let root: Node =
            ListNode::create(vec![Node::text(Length::new(0, 1)), outer, invalid], false).into();

        let found = brackets(&root);
        let summary: Vec<_> = found
            .iter()
            .map(|info| (info.kind, info.category.0, info.start.to_string(), info.level))
            .collect();

        assert_eq!(
            summary,
            vec![
                (BracketKind::Opening { closed: true }, 0, "0:1".to_owned(), 0),
                (BracketKind::Opening { closed: true }, 1, "1:0".to_owned(), 1),
                (BracketKind::Closing, 1, "1:2".to_owned(), 1),
                (BracketKind::Closing, 0, "1:3".to_owned(), 0),
                (BracketKind::Unexpected, 1, "1:4".to_owned(), 0),
            ]
        );
        assert_eq!(found[4].end, Length::new(1, 5));
    }

    #[test]
    fn unclosed_pair_has_no_closing_entry() {
        let mut cache = BracketCache::new();
        let pair: Node = PairNode::create(
            Category(3),
            cache.bracket(Length::new(0, 2)),
            Some(Node::text(Length::new(0, 4))),
            None,
        )
        .into();

        assert_eq!(
            brackets(&pair),
            vec![BracketInfo {
                kind: BracketKind::Opening { closed: false },
                category: Category(3),
                start: Length::ZERO,
                end: Length::new(0, 2),
                level: 0,
            }]
        );
    }
}
