// WHY: short toxic roots must stay detectable even when the dictionary filters out
// every compound that contains them ("buttfuck", "fcks")

use std::borrow::Cow;

use super::Category;

/// A seed root word with the category and score it carries into the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootWord {
    pub word: Cow<'static, str>,
    pub category: Category,
    pub severity_score: u32,
}

impl RootWord {
    pub const fn new_static(word: &'static str, category: Category, severity_score: u32) -> Self {
        Self {
            word: Cow::Borrowed(word),
            category,
            severity_score,
        }
    }
}

/// Roots seeded into every index unless a different table is injected
pub const DEFAULT_ROOT_WORDS: &[RootWord] = &[
    RootWord::new_static("fuck", Category::Negative, 4),
    RootWord::new_static("fck", Category::Negative, 4),
    RootWord::new_static("shit", Category::Negative, 3),
    RootWord::new_static("damn", Category::Negative, 3),
    RootWord::new_static("hell", Category::Negative, 3),
    RootWord::new_static("bitch", Category::Negative, 4),
    RootWord::new_static("ass", Category::Negative, 3),
    RootWord::new_static("bastard", Category::Negative, 3),
    RootWord::new_static("crap", Category::Negative, 3),
];

/// Declarative root table injected into dictionary construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootWordTable {
    roots: Vec<RootWord>,
}

impl RootWordTable {
    /// Build a table from arbitrary roots; words are lowercased and trimmed
    pub fn new(roots: impl IntoIterator<Item = RootWord>) -> Self {
        let roots = roots
            .into_iter()
            .map(|root| RootWord {
                word: Cow::Owned(root.word.trim().to_lowercase()),
                ..root
            })
            .filter(|root| !root.word.is_empty())
            .collect();
        Self { roots }
    }

    /// Table without any roots
    pub fn empty() -> Self {
        Self { roots: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RootWord> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Roots occurring as a substring of `phrase`
    pub fn roots_in<'a>(&'a self, phrase: &'a str) -> impl Iterator<Item = &'a RootWord> + 'a {
        self.roots.iter().filter(move |root| phrase.contains(root.word.as_ref()))
    }
}

impl Default for RootWordTable {
    fn default() -> Self {
        Self {
            roots: DEFAULT_ROOT_WORDS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_contents() {
        let table = RootWordTable::default();
        assert_eq!(table.len(), 9);
        let words: Vec<&str> = table.iter().map(|r| r.word.as_ref()).collect();
        for expected in ["fuck", "fck", "shit", "damn", "hell", "bitch", "ass", "bastard", "crap"] {
            assert!(words.contains(&expected), "missing root {expected}");
        }
        assert!(table.iter().all(|r| r.category == Category::Negative));
    }

    #[test]
    fn test_roots_in_compound() {
        let table = RootWordTable::default();
        let found: Vec<&str> = table.roots_in("buttfuck").map(|r| r.word.as_ref()).collect();
        assert_eq!(found, vec!["fuck"]);

        let found: Vec<&str> = table.roots_in("fcks").map(|r| r.word.as_ref()).collect();
        assert_eq!(found, vec!["fck"]);

        // "badass" also contains no other root
        let found: Vec<&str> = table.roots_in("badass").map(|r| r.word.as_ref()).collect();
        assert_eq!(found, vec!["ass"]);

        assert_eq!(table.roots_in("wonderful").count(), 0);
    }

    #[test]
    fn test_custom_table_normalizes_words() {
        let table = RootWordTable::new(vec![
            RootWord::new_static("  Heck ", Category::Neutral, 1),
            RootWord::new_static("   ", Category::Negative, 5),
        ]);
        assert_eq!(table.len(), 1);
        let root = table.iter().next().unwrap();
        assert_eq!(root.word, "heck");
        assert_eq!(root.severity_score, 1);
    }
}
