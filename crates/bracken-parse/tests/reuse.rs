use bracken_ast::{BracketCache, BracketKind, Node, NodeKind, NodeReader, brackets};
use bracken_length::Length;
use bracken_parse::{BracketTable, ParseStats, Parser, ReuseSource, Tokenizer, parse};

/// Maps offsets around a single replaced range back to the previous tree.
struct SingleEdit {
    reader: NodeReader,
    start: Length,
    old_end: Length,
    new_end: Length,
}

impl SingleEdit {
    fn new(old: &Node, start: Length, old_end: Length, new_end: Length) -> Self {
        Self { reader: NodeReader::new(old.clone()), start, old_end, new_end }
    }
}

impl ReuseSource for SingleEdit {
    fn read_reusable(
        &mut self,
        offset: Length,
        accept: &mut dyn FnMut(&Node, bool) -> bool,
    ) -> Option<Node> {
        let old = if offset < self.start {
            offset
        } else if offset >= self.new_end {
            self.old_end + Length::diff_non_negative(self.new_end, offset)
        } else {
            return None;
        };

        let after_edit = offset >= self.new_end;
        let limit = Length::diff_non_negative(offset, self.start);
        let edited_lines = self.start.lines()..=self.new_end.lines();
        self.reader.read_longest_node_at(old, |node| {
            // Lines are compared in the new document.
            let end_line = (offset + node.length()).lines();
            (after_edit || node.length() < limit) && accept(node, edited_lines.contains(&end_line))
        })
    }
}

fn reparse(
    text: &str,
    source: &mut dyn ReuseSource,
    cache: &mut BracketCache,
) -> (Node, ParseStats) {
    let table = BracketTable::default();
    let mut parser = Parser::new(Tokenizer::new(text, &table, cache)).with_reuse(source);
    let tree = parser.parse_document();
    (tree, parser.stats())
}

fn pair_at(root: &Node, index: usize) -> Node {
    root.child(index).cloned().expect("child exists")
}

/// Children of `root` with the list levels in between removed.
fn items(root: &Node) -> Vec<Node> {
    match root.kind() {
        NodeKind::List => root.children().flat_map(items).collect(),
        _ => vec![root.clone()],
    }
}

#[test]
fn unchanged_document_is_reused_whole() {
    let table = BracketTable::default();
    let mut cache = BracketCache::new();
    let old = parse("(a)[b]{c}", &table, &mut cache);

    let mut reader = NodeReader::new(old.clone());
    let (new, stats) = reparse("(a)[b]{c}", &mut reader, &mut cache);

    assert!(Node::ptr_eq(&old, &new));
    assert_eq!(stats, ParseStats { items_constructed: 0, items_from_cache: 1 });
}

#[test]
fn pairs_around_an_edit_are_reused() {
    let table = BracketTable::default();
    let mut cache = BracketCache::new();
    let old = parse("(a)(b)[c]", &table, &mut cache);

    let mut edit = SingleEdit::new(&old, Length::new(0, 5), Length::new(0, 5), Length::new(0, 6));
    let (new, stats) = reparse("(a)(bx)[c]", &mut edit, &mut cache);

    assert_eq!(new.length(), Length::new(0, 10));
    assert_eq!(stats, ParseStats { items_constructed: 2, items_from_cache: 2 });
    assert!(Node::ptr_eq(&pair_at(&new, 0), &pair_at(&old, 0)));
    assert!(!Node::ptr_eq(&pair_at(&new, 1), &pair_at(&old, 1)));
    assert!(Node::ptr_eq(&pair_at(&new, 2), &pair_at(&old, 2)));
}

#[test]
fn closing_an_open_pair_rebuilds_it() {
    let table = BracketTable::default();
    let mut cache = BracketCache::new();
    let old = parse("(a(b)c", &table, &mut cache);
    assert_eq!(brackets(&old)[0].kind, BracketKind::Opening { closed: false });

    let mut edit = SingleEdit::new(&old, Length::new(0, 6), Length::new(0, 6), Length::new(0, 7));
    let (new, stats) = reparse("(a(b)c)", &mut edit, &mut cache);

    assert!(!Node::ptr_eq(&old, &new));
    assert_eq!(brackets(&new)[0].kind, BracketKind::Opening { closed: true });
    assert_eq!(stats, ParseStats { items_constructed: 3, items_from_cache: 1 });

    let content = new.as_pair().and_then(|pair| pair.content()).expect("pair content");
    let old_content = old.as_pair().and_then(|pair| pair.content()).expect("pair content");
    assert!(Node::ptr_eq(&pair_at(content, 1), &pair_at(old_content, 1)));
}

#[test]
fn reused_tree_matches_a_fresh_parse() {
    let table = BracketTable::default();
    let mut cache = BracketCache::new();
    let old = parse("fn f() {\n  g(1, [2]);\n}\n", &table, &mut cache);

    let text = "fn f() {\n  g(1, [2]));\n}\n";
    let start = Length::new(1, 10);
    let mut edit = SingleEdit::new(&old, start, start, Length::new(1, 11));
    let (reused, _) = reparse(text, &mut edit, &mut cache);
    let fresh = parse(text, &table, &mut cache);

    assert_eq!(reused.length(), fresh.length());
    assert_eq!(brackets(&reused), brackets(&fresh));
}

#[test]
fn text_ending_on_the_edited_line_is_rebuilt() {
    let table = BracketTable::default();
    let mut cache = BracketCache::new();
    let old = parse("a\nb\n(c) d", &table, &mut cache);

    let start = Length::new(2, 5);
    let mut edit = SingleEdit::new(&old, start, start, Length::new(2, 6));
    let (new, stats) = reparse("a\nb\n(c) dx", &mut edit, &mut cache);

    assert_eq!(stats, ParseStats { items_constructed: 2, items_from_cache: 2 });
    let (old_items, new_items) = (items(&old), items(&new));
    assert_eq!(new_items.len(), 4);
    assert!(Node::ptr_eq(&new_items[0], &old_items[0]));
    // "b\n" ends at the start of the edited line.
    assert!(!Node::ptr_eq(&new_items[1], &old_items[1]));
    assert!(Node::ptr_eq(&new_items[2], &old_items[2]));
    assert_eq!(new_items[3].length(), Length::new(0, 3));
}

#[test]
fn opening_before_an_unexpected_closer_matches_a_fresh_parse() {
    let table = BracketTable::default();
    let mut cache = BracketCache::new();
    let old = parse("a) b]\n", &table, &mut cache);
    assert_eq!(brackets(&old)[0].kind, BracketKind::Unexpected);

    let text = "(a) b]\n";
    let mut edit = SingleEdit::new(&old, Length::ZERO, Length::ZERO, Length::new(0, 1));
    let (reused, _) = reparse(text, &mut edit, &mut cache);
    let fresh = parse(text, &table, &mut cache);

    assert_eq!(reused.length(), fresh.length());
    assert_eq!(brackets(&reused), brackets(&fresh));
    assert_eq!(brackets(&reused)[0].kind, BracketKind::Opening { closed: true });
}
