use bracken_ast::{Category, CategorySet, DenseKeys};
use rustc_hash::FxHashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    Opening(Category),
    Closing(Category),
}

/// The bracket pairs a tokenizer recognizes.
///
/// The pair at position `i` gets `Category(i)`. When one bracket text is a prefix of another,
/// the longer one wins.
#[derive(Debug, Clone)]
pub struct BracketTable {
    /// Longest texts first.
    entries: Vec<(Box<str>, Role)>,
    first_chars: FxHashSet<char>,
    keys: DenseKeys<Category>,
    pairs: usize,
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::new([("(", ")"), ("[", "]"), ("{", "}")])
    }
}

impl BracketTable {
    /// # Panics
    ///
    /// Panics if a bracket text is empty.
    pub fn new<'s>(pairs: impl IntoIterator<Item = (&'s str, &'s str)>) -> Self {
        let mut entries: Vec<(Box<str>, Role)> = Vec::new();
        let mut first_chars = FxHashSet::default();
        let mut keys = DenseKeys::new();
        let mut count = 0;

        for (index, (opening, closing)) in pairs.into_iter().enumerate() {
            assert!(!opening.is_empty() && !closing.is_empty(), "bracket texts must not be empty");
            let category = Category(index as u32);
            keys.key(category);

            for (text, role) in [(opening, Role::Opening(category)), (closing, Role::Closing(category))] {
                first_chars.extend(text.chars().next());
                entries.push((Box::from(text), role));
            }
            count += 1;
        }
        // Stable, so an opening text that is also a closing text stays an opening bracket.
        entries.sort_by_key(|(text, _)| std::cmp::Reverse(text.len()));

        Self { entries, first_chars, keys, pairs: count }
    }

    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// Dense key of `category` in this table.
    ///
    /// # Panics
    ///
    /// Panics if the category does not belong to this table.
    #[track_caller]
    pub fn key(&self, category: Category) -> u32 {
        self.keys.get(&category).unwrap_or_else(|| panic!("unknown bracket category {category}"))
    }

    #[track_caller]
    pub fn categories(&self, category: Category) -> CategorySet {
        CategorySet::singleton(self.key(category))
    }

    pub(crate) fn may_start_bracket(&self, c: char) -> bool {
        self.first_chars.contains(&c)
    }

    /// Returns the bracket at the start of `text` and its length in bytes.
    pub(crate) fn match_at(&self, text: &str) -> Option<(Role, usize)> {
        let first = text.chars().next()?;
        if !self.may_start_bracket(first) {
            return None;
        }

        self.entries
            .iter()
            .find(|(bracket, _)| text.starts_with(&**bracket))
            .map(|(bracket, role)| (*role, bracket.len()))
    }
}
