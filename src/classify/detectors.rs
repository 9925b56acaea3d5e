//! Signal detectors: stateless predicates over normalized text.
//!
//! Every detector expects text that already went through [`normalize`]
//! (lower-case, trimmed, single spaces). None of them mutate their input.

use super::indicators::tables;

/// Lower-case, trim and collapse whitespace runs into single spaces.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_space = false;
        }
    }
    out
}

/// Composite-dish phrase, or a `with|and|in|on <word>` connective.
pub fn contains_composite_indicator(text: &str) -> bool {
    composite_match(text).is_some()
}

/// The phrase that made `text` composite, if any.
pub fn composite_match(text: &str) -> Option<&str> {
    let t = tables();
    t.composite_phrases.find(text).or_else(|| {
        t.composite_connectives
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.as_str())
    })
}

/// Packaging or preservation word (tinned, frozen, smoked, ...).
pub fn has_packaged_format_indicator(text: &str) -> bool {
    tables().packaged_formats.matches(text)
}

/// Name contains an entry of the combined branded-product tables.
/// Independent of packaging words.
pub fn is_known_branded_product(name: &str) -> bool {
    tables().branded_products.matches(name)
}

/// Which brand table fired, for explainability.
pub fn brand_family(name: &str) -> Option<BrandFamily> {
    let t = tables();
    if t.chocolate_bars.matches(name) {
        Some(BrandFamily::ChocolateBar)
    } else if t.confectionery.matches(name) {
        Some(BrandFamily::Confectionery)
    } else if t.soft_drinks.matches(name) {
        Some(BrandFamily::SoftDrink)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandFamily {
    ChocolateBar,
    Confectionery,
    SoftDrink,
}

impl BrandFamily {
    pub fn label(self) -> &'static str {
        match self {
            BrandFamily::ChocolateBar => "chocolate bar",
            BrandFamily::Confectionery => "confectionery",
            BrandFamily::SoftDrink => "soft drink",
        }
    }
}

/// Why a query counts as ambiguous. Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbiguityRule {
    EmptyQuery,
    GenericSingleWord,
    VaguePreparationPlusGeneric,
    MuchShorterThanMatch,
}

impl AmbiguityRule {
    pub fn describe(self) -> &'static str {
        match self {
            AmbiguityRule::EmptyQuery => "empty query",
            AmbiguityRule::GenericSingleWord => "single generic food word",
            AmbiguityRule::VaguePreparationPlusGeneric => "vague preparation + generic food word",
            AmbiguityRule::MuchShorterThanMatch => "query much shorter than matched name",
        }
    }
}

pub fn is_ambiguous_query(query: &str, matched_name: &str) -> bool {
    ambiguity_rule(query, matched_name).is_some()
}

/// First ambiguity rule that fires, short-circuiting on the first match.
pub fn ambiguity_rule(query: &str, matched_name: &str) -> Option<AmbiguityRule> {
    let t = tables();

    if query.is_empty() {
        return Some(AmbiguityRule::EmptyQuery);
    }

    // "salmon," and "salmon." are still the bare word.
    let words: Vec<&str> = query
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() == 1 && t.ambiguous_words.contains(words[0]) {
        return Some(AmbiguityRule::GenericSingleWord);
    }

    if words.len() == 2
        && t.vague_preparations.contains(words[0])
        && t.ambiguous_words.contains(words[1])
    {
        return Some(AmbiguityRule::VaguePreparationPlusGeneric);
    }

    let q_len = query.chars().count();
    let name_len = matched_name.chars().count();
    if q_len * 2 < name_len {
        return Some(AmbiguityRule::MuchShorterThanMatch);
    }

    None
}

/// Specific cut or form ("fillet", "breast", "slice", ...). Only ever a
/// confidence booster.
pub fn has_form_factor_qualifier(text: &str) -> bool {
    tables().form_factors.matches(text)
}

/// Preparation method word that turns an atomic food into `AtomicPrepared`.
pub fn has_preparation_method(text: &str) -> bool {
    tables().preparation_methods.matches(text)
}
