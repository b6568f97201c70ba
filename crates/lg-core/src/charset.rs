use std::collections::BTreeSet;

/// Default active set: the ten decimal digits.
pub const CHARSET_DIGITS: &str = "0123456789";

/// First printable ASCII character.
pub const PRINTABLE_FIRST: char = ' ';

/// Last printable ASCII character.
pub const PRINTABLE_LAST: char = '~';

/// Ordered set of characters eligible for rendering.
///
/// Iteration is always in code-point order.
///
/// # Example
/// ```
/// use lg_core::charset::CharSet;
/// let mut set = CharSet::from_chars("ba");
/// set.insert_range('x', 'z');
/// assert_eq!(set.iter().collect::<String>(), "abxyz");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharSet {
    chars: BTreeSet<char>,
}

impl CharSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding every character of `s` (duplicates collapse).
    #[must_use]
    pub fn from_chars(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
        }
    }

    /// Add one character.
    pub fn insert(&mut self, ch: char) {
        self.chars.insert(ch);
    }

    /// Remove one character.
    pub fn remove(&mut self, ch: char) {
        self.chars.remove(&ch);
    }

    /// Add every character of the inclusive range, in either order.
    pub fn insert_range(&mut self, a: char, b: char) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.chars.extend(lo..=hi);
    }

    /// Remove every character of the inclusive range, in either order.
    pub fn remove_range(&mut self, a: char, b: char) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for ch in lo..=hi {
            self.chars.remove(&ch);
        }
    }

    /// Apply a parsed selection, adding or removing.
    pub fn apply(&mut self, selection: CharSelection, add: bool) {
        match (selection, add) {
            (CharSelection::Single(ch), true) => self.insert(ch),
            (CharSelection::Single(ch), false) => self.remove(ch),
            (CharSelection::Range(a, b), true) => self.insert_range(a, b),
            (CharSelection::Range(a, b), false) => self.remove_range(a, b),
        }
    }

    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Characters in code-point order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

/// Argument of the shell's `add` / `remove` commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharSelection {
    /// One character.
    Single(char),
    /// Inclusive range, stored as given.
    Range(char, char),
}

impl CharSelection {
    /// Parse a command argument.
    ///
    /// Accepted forms: a single character, `all` (printable ASCII),
    /// `space`, or `a-z` (either order).
    ///
    /// # Example
    /// ```
    /// use lg_core::charset::CharSelection;
    /// assert_eq!(CharSelection::parse("q"), Some(CharSelection::Single('q')));
    /// assert_eq!(CharSelection::parse("space"), Some(CharSelection::Single(' ')));
    /// assert_eq!(CharSelection::parse("z-a"), Some(CharSelection::Range('z', 'a')));
    /// assert_eq!(CharSelection::parse("abc"), None);
    /// ```
    #[must_use]
    pub fn parse(arg: &str) -> Option<Self> {
        let chars: Vec<char> = arg.chars().collect();
        match chars.as_slice() {
            [ch] => Some(Self::Single(*ch)),
            _ if arg == "all" => Some(Self::Range(PRINTABLE_FIRST, PRINTABLE_LAST)),
            _ if arg == "space" => Some(Self::Single(' ')),
            [a, '-', b] => Some(Self::Range(*a, *b)),
            _ => None,
        }
    }
}
