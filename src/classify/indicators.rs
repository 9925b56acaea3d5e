//! Indicator tables: versioned classification signals embedded at build time.
//!
//! The raw lists live in `data/indicators.json`. They are parsed once into a
//! process-wide immutable [`IndicatorTables`] and every word list is compiled
//! into a single word-bounded regex. Nothing mutates them after init.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;

static TABLES: Lazy<IndicatorTables> = Lazy::new(|| {
    let raw = include_str!("../../data/indicators.json");
    let parsed: RawTables = serde_json::from_str(raw).expect("valid indicator tables");
    IndicatorTables::from_raw(parsed)
});

/// Process-wide indicator tables.
pub fn tables() -> &'static IndicatorTables {
    &TABLES
}

/// Version string shipped with the embedded tables.
pub fn indicator_version() -> &'static str {
    &TABLES.version
}

#[derive(Debug, Deserialize)]
struct RawTables {
    version: String,
    composite_phrases: Vec<String>,
    composite_connectives: Vec<String>,
    ambiguous_words: Vec<String>,
    vague_preparations: Vec<String>,
    preparation_methods: Vec<String>,
    form_factors: Vec<String>,
    packaged_formats: Vec<String>,
    branded_products: RawBrands,
    liquid_words: Vec<String>,
    #[serde(default)]
    solid_words: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawBrands {
    #[serde(default)]
    chocolate_bars: Vec<String>,
    #[serde(default)]
    confectionery: Vec<String>,
    #[serde(default)]
    soft_drinks: Vec<String>,
}

#[derive(Debug)]
pub struct IndicatorTables {
    pub version: String,
    pub composite_phrases: WordSet,
    /// `with|and|in|on` followed by a word.
    pub composite_connectives: Option<Regex>,
    pub ambiguous_words: WordSet,
    pub vague_preparations: WordSet,
    pub preparation_methods: WordSet,
    pub form_factors: WordSet,
    pub packaged_formats: WordSet,
    pub chocolate_bars: WordSet,
    pub confectionery: WordSet,
    pub soft_drinks: WordSet,
    /// Union of the three brand tables.
    pub branded_products: WordSet,
    pub liquid_words: WordSet,
    /// Solid head nouns that outrank an earlier liquid word ("milk chocolate").
    pub solid_words: WordSet,
}

impl IndicatorTables {
    fn from_raw(raw: RawTables) -> Self {
        let brands = &raw.branded_products;
        let all_brands = brands
            .chocolate_bars
            .iter()
            .chain(&brands.confectionery)
            .chain(&brands.soft_drinks)
            .cloned();

        Self {
            composite_connectives: connective_regex(&raw.composite_connectives),
            composite_phrases: WordSet::new(raw.composite_phrases),
            ambiguous_words: WordSet::new(raw.ambiguous_words),
            vague_preparations: WordSet::new(raw.vague_preparations),
            preparation_methods: WordSet::new(raw.preparation_methods),
            form_factors: WordSet::new(raw.form_factors),
            packaged_formats: WordSet::new(raw.packaged_formats),
            branded_products: WordSet::new(all_brands),
            chocolate_bars: WordSet::new(raw.branded_products.chocolate_bars),
            confectionery: WordSet::new(raw.branded_products.confectionery),
            soft_drinks: WordSet::new(raw.branded_products.soft_drinks),
            liquid_words: WordSet::new(raw.liquid_words),
            solid_words: WordSet::new(raw.solid_words),
            version: raw.version,
        }
    }
}

/// A normalized word/phrase list plus its compiled matcher.
///
/// Matching is word-bounded at both ends and tolerates a plural suffix, so
/// `pie` matches "pies" but not "piece".
#[derive(Debug)]
pub struct WordSet {
    words: BTreeSet<String>,
    re: Option<Regex>,
}

impl WordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        // Longest alternatives first so multi-word phrases win over their prefixes.
        let mut alts: Vec<&String> = words.iter().collect();
        alts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let re = if alts.is_empty() {
            None
        } else {
            let body = alts
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"\b(?:{body})(?:s|es)?\b");
            Some(Regex::new(&pattern).expect("escaped word list compiles"))
        };

        Self { words, re }
    }

    /// Exact membership of a single normalized token.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Word-bounded containment anywhere in normalized `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.re.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// First (leftmost) matching phrase, for explainability.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.re
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.as_str())
    }

    /// Longest matching phrase anywhere in `text` (plural suffix included).
    pub fn longest_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.re
            .as_ref()
            .and_then(|re| re.find_iter(text).max_by_key(|m| m.len()))
            .map(|m| m.as_str())
    }

    /// End offset of the rightmost match in `text`.
    pub fn last_match_end(&self, text: &str) -> Option<usize> {
        self.re
            .as_ref()
            .and_then(|re| re.find_iter(text).last())
            .map(|m| m.end())
    }

    /// Words in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn connective_regex(words: &[String]) -> Option<Regex> {
    let alts: Vec<String> = words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(&w))
        .collect();
    if alts.is_empty() {
        return None;
    }
    let pattern = format!(r"\b(?:{})\s+\w+", alts.join("|"));
    Some(Regex::new(&pattern).expect("connective regex compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_load() {
        let t = tables();
        assert!(!indicator_version().is_empty());
        assert!(t.composite_phrases.contains("en croute"));
        assert!(t.ambiguous_words.contains("salmon"));
        assert!(t.vague_preparations.contains("cooked"));
        assert!(t.packaged_formats.contains("tinned"));
        assert!(t.composite_connectives.is_some());
        assert_eq!(
            t.branded_products.len(),
            t.chocolate_bars.len() + t.confectionery.len() + t.soft_drinks.len()
        );
    }

    #[test]
    fn word_set_is_word_bounded_with_plurals() {
        let s = WordSet::new(["pie", "sandwich", "fish and chips"]);
        assert!(s.matches("apple pie"));
        assert!(s.matches("mince pies"));
        assert!(s.matches("ham sandwiches"));
        assert!(s.matches("cod fish and chips"));
        assert!(!s.matches("chicken piece"));
        assert!(!s.matches("pied"));
    }

    #[test]
    fn word_set_prefers_longest_phrase() {
        let s = WordSet::new(["milk", "dairy milk"]);
        assert_eq!(s.find("cadbury dairy milk"), Some("dairy milk"));
    }

    #[test]
    fn last_match_end_reports_rightmost_hit() {
        let s = WordSet::new(["milk", "chocolate"]);
        assert_eq!(s.last_match_end("milk chocolate"), Some(14));
        assert_eq!(s.last_match_end("chocolate milk"), Some(14));
        assert_eq!(s.last_match_end("milk"), Some(4));
        assert_eq!(s.last_match_end("bread"), None);
    }

    #[test]
    fn empty_word_set_never_matches() {
        let s = WordSet::new(Vec::<String>::new());
        assert!(s.is_empty());
        assert!(!s.matches("anything"));
        assert_eq!(s.find("anything"), None);
    }
}
