use bracken_ast::{BracketKind, Node, brackets};
use bracken_errors::Diagnostic;
use bracken_length::LineMap;
use text_size::TextRange;

/// Reports every unexpected closing bracket as an error and every unclosed opening bracket as
/// a warning, in document order.
pub(crate) fn check(text: &str, tree: &Node) -> Vec<Diagnostic> {
    let lines = LineMap::new(text);

    brackets(tree)
        .into_iter()
        .filter_map(|bracket| {
            let range = TextRange::new(lines.offset(bracket.start)?, lines.offset(bracket.end)?);
            let source = &text[range];
            match bracket.kind {
                BracketKind::Unexpected => Some(
                    Diagnostic::error(format!("unexpected closing bracket `{source}`"), range)
                        .with_label("no open pair of this kind"),
                ),
                BracketKind::Opening { closed: false } => Some(
                    Diagnostic::warning(format!("unclosed bracket `{source}`"), range)
                        .with_label("never closed")
                        .with_note("the pair runs to the end of the enclosing pair or document"),
                ),
                BracketKind::Opening { closed: true } | BracketKind::Closing => None,
            }
        })
        .collect()
}
