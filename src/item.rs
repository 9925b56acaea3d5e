//! Matched catalog item — the read-only input supplied by the search layer.
//!
//! The engine never resolves a query to an item itself; it receives the best
//! match and only reads from it.

use serde::{Deserialize, Serialize};

use crate::classify::detectors::normalize;
use crate::classify::indicators::tables;

/// Catalog entry the query resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedItem {
    /// Display name as shown in the catalog (e.g. "Salmon en croute").
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Energy per 100 g (or 100 ml for liquids).
    pub calories_per_100: f64,
    #[serde(default)]
    pub verified: bool,
    /// Known pack/serving size in grams or millilitres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    /// Ordered ingredient list; the first element is the primary ingredient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl MatchedItem {
    pub fn new(name: impl Into<String>, calories_per_100: f64) -> Self {
        Self {
            name: name.into(),
            brand: None,
            calories_per_100,
            verified: false,
            serving_size: None,
            ingredients: None,
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    pub fn serving_size(mut self, size: f64) -> Self {
        self.serving_size = Some(size);
        self
    }

    pub fn ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = Some(ingredients.into_iter().map(Into::into).collect());
        self
    }

    /// Pack size usable as a portion: present, finite and positive.
    pub fn pack_size(&self) -> Option<f64> {
        self.serving_size.filter(|s| s.is_finite() && *s > 0.0)
    }

    /// Calories with non-finite or negative catalog values treated as zero.
    pub fn calories(&self) -> f64 {
        if self.calories_per_100.is_finite() && self.calories_per_100 > 0.0 {
            self.calories_per_100
        } else {
            0.0
        }
    }

    /// Name-based, then primary-ingredient-based liquid heuristic.
    /// A missing ingredient list is simply no signal.
    pub fn unit(&self) -> ServingUnit {
        if let Some(unit) = head_unit(&normalize(&self.name)) {
            return unit;
        }
        self.ingredients
            .as_deref()
            .and_then(|list| list.first())
            .and_then(|first| head_unit(&normalize(first)))
            .unwrap_or(ServingUnit::Grams)
    }
}

/// Unit implied by the rightmost liquid or solid word in `text`.
///
/// English puts the head noun last, so "milk chocolate" is solid and
/// "chocolate milk" liquid. On a shared end ("hot chocolate" vs "chocolate")
/// the liquid phrase wins.
fn head_unit(text: &str) -> Option<ServingUnit> {
    let t = tables();
    let liquid = t.liquid_words.last_match_end(text);
    let solid = t.solid_words.last_match_end(text);
    match (liquid, solid) {
        (Some(l), Some(s)) if l >= s => Some(ServingUnit::Millilitres),
        (Some(_), None) => Some(ServingUnit::Millilitres),
        (_, Some(_)) => Some(ServingUnit::Grams),
        (None, None) => None,
    }
}

/// Unit a portion amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServingUnit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Millilitres,
}

impl ServingUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            ServingUnit::Grams => "g",
            ServingUnit::Millilitres => "ml",
        }
    }
}
