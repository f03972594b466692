use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Identifier of a bracket family, e.g. parentheses or braces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category(pub u32);

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Hands out consecutive keys to distinct values, keeping bitsets over them compact.
#[derive(Debug, Clone)]
pub struct DenseKeys<T> {
    keys: FxHashMap<T, u32>,
}

impl<T> Default for DenseKeys<T> {
    fn default() -> Self {
        Self { keys: FxHashMap::default() }
    }
}

impl<T: Hash + Eq> DenseKeys<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&mut self, value: T) -> u32 {
        let next = self.keys.len() as u32;
        *self.keys.entry(value).or_insert(next)
    }

    pub fn get(&self, value: &T) -> Option<u32> {
        self.keys.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Immutable set of dense keys.
///
/// Keys below 64 live inline. Larger keys spill into a boxed slice that never ends in a
/// zero word, so derived equality is set equality.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct CategorySet {
    inline: u64,
    spilled: Option<Box<[u64]>>,
}

impl CategorySet {
    pub const EMPTY: Self = Self { inline: 0, spilled: None };
    const BITS_PER_WORD: u32 = u64::BITS;

    pub fn singleton(key: u32) -> Self {
        let word = (key / Self::BITS_PER_WORD) as usize;
        let mask = 1 << (key % Self::BITS_PER_WORD);

        if word == 0 {
            return Self { inline: mask, spilled: None };
        }

        let mut spilled = vec![0; word].into_boxed_slice();
        spilled[word - 1] = mask;
        Self { inline: 0, spilled: Some(spilled) }
    }

    pub fn add<T: Hash + Eq>(&self, value: T, keys: &mut DenseKeys<T>) -> Self {
        self.merge(&Self::singleton(keys.key(value)))
    }

    pub fn merge(&self, other: &Self) -> Self {
        let spilled = match (&self.spilled, &other.spilled) {
            (None, None) => None,
            (Some(words), None) | (None, Some(words)) => Some(words.clone()),
            (Some(left), Some(right)) => {
                let (long, short) = if left.len() >= right.len() { (left, right) } else { (right, left) };
                let mut words = long.clone();
                for (word, other) in words.iter_mut().zip(short.iter()) {
                    *word |= other;
                }
                Some(words)
            }
        };

        Self { inline: self.inline | other.inline, spilled }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        if self.inline & other.inline != 0 {
            return true;
        }

        match (&self.spilled, &other.spilled) {
            (Some(left), Some(right)) => left.iter().zip(right.iter()).any(|(l, r)| l & r != 0),
            _ => false,
        }
    }

    pub fn contains_key(&self, key: u32) -> bool {
        let word = (key / Self::BITS_PER_WORD) as usize;
        let mask = 1 << (key % Self::BITS_PER_WORD);

        if word == 0 {
            return self.inline & mask != 0;
        }

        self.spilled.as_ref().and_then(|words| words.get(word - 1)).is_some_and(|w| w & mask != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.inline == 0 && self.spilled.is_none()
    }

    /// Iterates over the contained keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        let spilled = self.spilled.as_deref().unwrap_or_default();

        std::iter::once(self.inline).chain(spilled.iter().copied()).enumerate().flat_map(
            |(word_index, word)| {
                (0..Self::BITS_PER_WORD)
                    .filter(move |bit| word & (1 << bit) != 0)
                    .map(move |bit| word_index as u32 * Self::BITS_PER_WORD + bit)
            },
        )
    }
}

impl fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}
