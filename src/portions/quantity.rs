//! Stated quantities: "2 sausages", "3 eggs", "1 slice".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static LEADING_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3})\s+([a-z]+)\b").expect("quantity regex"));

/// A leading integer count followed by a unit noun, noun singularized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatedQuantity {
    pub count: u32,
    pub noun: String,
}

/// Parse a normalized query. Zero counts are not quantities.
pub fn parse_stated_quantity(query: &str) -> Option<StatedQuantity> {
    let caps = LEADING_COUNT.captures(query)?;
    let count: u32 = caps.get(1)?.as_str().parse().ok()?;
    if count == 0 {
        return None;
    }
    let noun = singularize(caps.get(2)?.as_str());
    Some(StatedQuantity { count, noun })
}

pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    for suffix in ["oes", "ches", "shes", "sses", "xes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// "egg" → "eggs" for count labels.
pub fn pluralize(noun: &str, count: u32) -> String {
    if count == 1 {
        return noun.to_string();
    }
    if let Some(stem) = noun.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if noun.ends_with(['o', 's', 'x']) || noun.ends_with("ch") || noun.ends_with("sh") {
        return format!("{noun}es");
    }
    format!("{noun}s")
}
