//! Slug-keyed token maps, one per property kind.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Color,
    FontSize,
    LineHeight,
    Shadow,
}

impl TokenKind {
    pub const ALL: [TokenKind; 4] = [
        TokenKind::Color,
        TokenKind::FontSize,
        TokenKind::LineHeight,
        TokenKind::Shadow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Color => "color",
            TokenKind::FontSize => "fontSize",
            TokenKind::LineHeight => "lineHeight",
            TokenKind::Shadow => "shadow",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type TokenMap = BTreeMap<String, String>;

/// The four token maps produced by one source (or by a merge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    #[serde(default)]
    pub colors: TokenMap,
    #[serde(default)]
    pub font_sizes: TokenMap,
    #[serde(default)]
    pub line_heights: TokenMap,
    #[serde(default)]
    pub shadows: TokenMap,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCounts {
    pub colors: usize,
    pub font_sizes: usize,
    pub line_heights: usize,
    pub shadows: usize,
}

impl TokenCounts {
    pub fn total(&self) -> usize {
        self.colors + self.font_sizes + self.line_heights + self.shadows
    }
}

impl TokenSet {
    pub fn map(&self, kind: TokenKind) -> &TokenMap {
        match kind {
            TokenKind::Color => &self.colors,
            TokenKind::FontSize => &self.font_sizes,
            TokenKind::LineHeight => &self.line_heights,
            TokenKind::Shadow => &self.shadows,
        }
    }

    pub fn map_mut(&mut self, kind: TokenKind) -> &mut TokenMap {
        match kind {
            TokenKind::Color => &mut self.colors,
            TokenKind::FontSize => &mut self.font_sizes,
            TokenKind::LineHeight => &mut self.line_heights,
            TokenKind::Shadow => &mut self.shadows,
        }
    }

    /// Assign `value` to every slug, overwriting earlier values.
    pub fn insert(&mut self, kind: TokenKind, slugs: &[String], value: &str) {
        let map = self.map_mut(kind);
        for slug in slugs {
            map.insert(slug.clone(), value.to_string());
        }
    }

    pub fn get(&self, kind: TokenKind, slug: &str) -> Option<&str> {
        self.map(kind).get(slug).map(String::as_str)
    }

    /// First candidate with a value, in the order given.
    pub fn lookup<'a>(
        &'a self,
        kind: TokenKind,
        candidates: &'a [String],
    ) -> Option<(&'a str, &'a str)> {
        let map = self.map(kind);
        candidates
            .iter()
            .find_map(|slug| map.get(slug).map(|value| (slug.as_str(), value.as_str())))
    }

    pub fn counts(&self) -> TokenCounts {
        TokenCounts {
            colors: self.colors.len(),
            font_sizes: self.font_sizes.len(),
            line_heights: self.line_heights.len(),
            shadows: self.shadows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    /// Add every slug from `other` that is not already present here.
    pub fn absorb(&mut self, other: &TokenSet) {
        for kind in TokenKind::ALL {
            let target = self.map_mut(kind);
            for (slug, value) in other.map(kind) {
                target.entry(slug.clone()).or_insert_with(|| value.clone());
            }
        }
    }
}

/// Merge sources ordered most authoritative first; earlier sources win.
pub fn merge_token_sets<'a, I>(sources: I) -> TokenSet
where
    I: IntoIterator<Item = &'a TokenSet>,
{
    let mut merged = TokenSet::default();
    for source in sources {
        merged.absorb(source);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn insert_broadcasts_and_overwrites() {
        let mut set = TokenSet::default();
        set.insert(TokenKind::Color, &slugs(&["a", "b"]), "#111111");
        set.insert(TokenKind::Color, &slugs(&["b"]), "#222222");
        assert_eq!(set.get(TokenKind::Color, "a"), Some("#111111"));
        assert_eq!(set.get(TokenKind::Color, "b"), Some("#222222"));
        assert_eq!(set.get(TokenKind::Shadow, "a"), None);
    }

    #[test]
    fn merge_prefers_earlier_sources() {
        let mut frame = TokenSet::default();
        frame.insert(TokenKind::Color, &slugs(&["a"]), "#111111");
        let mut styles = TokenSet::default();
        styles.insert(TokenKind::Color, &slugs(&["a"]), "#222222");
        styles.insert(TokenKind::Color, &slugs(&["b"]), "#333333");

        let merged = merge_token_sets([&frame, &styles]);
        assert_eq!(merged.get(TokenKind::Color, "a"), Some("#111111"));
        assert_eq!(merged.get(TokenKind::Color, "b"), Some("#333333"));
        assert_eq!(merged.colors.len(), 2);
    }

    #[test]
    fn lookup_returns_first_hit_in_candidate_order() {
        let mut set = TokenSet::default();
        set.insert(TokenKind::FontSize, &slugs(&["body"]), "#{rem(16px)}");
        set.insert(TokenKind::FontSize, &slugs(&["mobile-body"]), "#{rem(14px)}");
        let candidates = slugs(&["mobile-body", "body"]);
        assert_eq!(
            set.lookup(TokenKind::FontSize, &candidates),
            Some(("mobile-body", "#{rem(14px)}"))
        );
        assert_eq!(set.lookup(TokenKind::Color, &candidates), None);
    }

    #[test]
    fn counts_cover_all_kinds() {
        let mut set = TokenSet::default();
        set.insert(TokenKind::Shadow, &slugs(&["card"]), "0px 1px 2px #000000");
        set.insert(TokenKind::LineHeight, &slugs(&["body", "text"]), "1.5");
        let counts = set.counts();
        assert_eq!(counts.shadows, 1);
        assert_eq!(counts.line_heights, 2);
        assert_eq!(counts.total(), 3);
        assert!(!set.is_empty());
    }
}
