use std::collections::HashSet;
use std::collections::hash_set;
use std::fmt;
use std::hash::Hash;

/// An order-losing collection of extracted tokens.
///
/// Duplicates collapse on insertion and iteration order is whatever the
/// underlying hash set yields. Positional access (`first`, `nth`) exists
/// because the plan reconciler pairs entries with code blocks by position,
/// but nothing guarantees that position matches appearance order in the
/// generated text.
#[derive(Debug, Clone)]
pub struct TokenSet<T> {
    items: HashSet<T>,
}

impl<T: Eq + Hash> TokenSet<T> {
    pub fn new() -> Self {
        Self {
            items: HashSet::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, T> {
        self.items.iter()
    }

    /// First entry in iteration order.
    pub fn first(&self) -> Option<&T> {
        self.items.iter().next()
    }

    /// The `n`-th entry in iteration order.
    pub fn nth(&self, n: usize) -> Option<&T> {
        self.items.iter().nth(n)
    }
}

impl<T: Eq + Hash> Default for TokenSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> FromIterator<T> for TokenSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a TokenSet<T> {
    type Item = &'a T;
    type IntoIter = hash_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A directory name taken from a `mkdir`-style mention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryToken(String);

impl DirectoryToken {
    /// Returns `None` for noise: single-character names and names made only
    /// of dots (`.`, `..`), which would resolve outside the anchor.
    pub fn new(name: &str) -> Option<Self> {
        if name.chars().count() <= 1 || name.chars().all(|c| c == '.') {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectoryToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A filename mention with a whitelisted extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilenameToken(String);

impl FilenameToken {
    pub fn new(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilenameToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language tags recognised after an opening fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FenceLanguage {
    Python,
    JavaScript,
    Json,
    Yaml,
    Shell,
    Html,
    Css,
    Dockerfile,
}

impl FenceLanguage {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "bash" | "sh" => Some(Self::Shell),
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "dockerfile" => Some(Self::Dockerfile),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Shell => "bash",
            Self::Html => "html",
            Self::Css => "css",
            Self::Dockerfile => "dockerfile",
        }
    }
}

/// One fenced region of generated text, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Position among all blocks, in appearance order
    pub index: usize,
    /// Text between the fences, not trimmed
    pub content: String,
    /// `None` when the tag was absent or not in the recognised set
    pub language: Option<FenceLanguage>,
}

impl CodeBlock {
    /// Content as it is written to disk.
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_token_rejects_noise() {
        assert!(DirectoryToken::new("a").is_none());
        assert!(DirectoryToken::new("").is_none());
        assert!(DirectoryToken::new("..").is_none());
        assert!(DirectoryToken::new("...").is_none());
        assert_eq!(DirectoryToken::new("Calc").unwrap().name(), "Calc");
        assert_eq!(DirectoryToken::new(".venv").unwrap().name(), ".venv");
    }

    #[test]
    fn token_set_collapses_duplicates() {
        let set: TokenSet<FilenameToken> = ["main.py", "main.py", "app.js"]
            .iter()
            .filter_map(|n| FilenameToken::new(n))
            .collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains(&FilenameToken::new("app.js").unwrap()));
        assert!(set.nth(2).is_none());
        assert!(set.first().is_some());
    }

    #[test]
    fn fence_language_aliases() {
        assert_eq!(FenceLanguage::from_tag("py"), Some(FenceLanguage::Python));
        assert_eq!(FenceLanguage::from_tag("yml"), Some(FenceLanguage::Yaml));
        assert_eq!(FenceLanguage::from_tag("sh"), Some(FenceLanguage::Shell));
        assert_eq!(FenceLanguage::from_tag("rust"), None);
    }

    #[test]
    fn code_block_trims_only_on_request() {
        let block = CodeBlock {
            index: 0,
            content: "\n  print('hi')\n\n".to_string(),
            language: None,
        };
        assert_eq!(block.trimmed(), "print('hi')");
        assert!(block.content.starts_with('\n'));
    }
}
