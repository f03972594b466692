use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Self::Warning => Level::Warning,
            Self::Error => Level::Error,
        }
    }
}

/// A finding about one bracket of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    range: TextRange,
    /// Text printed under the bracket.
    label: Option<String>,
    notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Severity::Error, message.into(), range)
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(Severity::Warning, message.into(), range)
    }

    fn new(severity: Severity, message: String, range: TextRange) -> Self {
        Self { severity, message, range, label: None, notes: Vec::new() }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Formats the diagnostic against the document it was reported for.
    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();

        let mut bracket = level.span(self.range.into());
        if let Some(label) = &self.label {
            bracket = bracket.label(label);
        }
        let source = Snippet::source(text).origin(path).fold(true).annotation(bracket);

        let notes = self.notes.iter().map(|note| Level::Note.title(note));
        renderer.render(level.title(&self.message).snippet(source).footers(notes))
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    fn plain(diagnostic: &Diagnostic, text: &str) -> String {
        diagnostic.render(&Renderer::plain(), "a.txt", text).to_string()
    }

    #[test]
    fn renders_location_and_message() {
        let range = TextRange::at(TextSize::new(5), 1.into());
        let diagnostic = Diagnostic::error("unexpected closing bracket", range)
            .with_label("nothing to close");
        let rendered = plain(&diagnostic, "f(x) ]\n");

        assert!(rendered.starts_with("error: unexpected closing bracket"));
        assert!(rendered.contains("a.txt:1:6"));
        assert!(rendered.contains("f(x) ]"));
        assert!(rendered.contains("^ nothing to close"));
    }

    #[test]
    fn warnings_render_as_warnings() {
        let diagnostic = Diagnostic::warning("unclosed bracket", TextRange::at(0.into(), 1.into()));
        assert_eq!(diagnostic.severity(), Severity::Warning);
        assert_eq!(diagnostic.label(), None);

        let rendered = plain(&diagnostic, "(a");
        assert!(rendered.starts_with("warning: unclosed bracket"));
    }

    #[test]
    fn notes_render_after_the_snippet() {
        let diagnostic = Diagnostic::warning("unclosed bracket", TextRange::at(0.into(), 1.into()))
            .with_note("first")
            .with_note("second");
        assert_eq!(diagnostic.notes(), ["first", "second"]);

        let rendered = plain(&diagnostic, "(a\n");
        let first = rendered.find("note: first").expect("first note");
        let second = rendered.find("note: second").expect("second note");
        assert!(rendered.find("(a").is_some_and(|snippet| snippet < first));
        assert!(first < second);
    }

    #[test]
    fn errors_sort_after_warnings() {
        assert!(Severity::Error > Severity::Warning);
    }
}
