//! Preset portion ladders (category cuts and brand pack sizes).
//!
//! The ladders are lookup data in `data/presets.json`; the engine only decides
//! which ladder applies. Selection is by the longest keyword found in the
//! item's normalized name; ties go to the ladder listed first.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::classify::indicators::WordSet;
use crate::item::ServingUnit;

static PRESETS: Lazy<PresetTables> = Lazy::new(|| {
    let raw = include_str!("../../data/presets.json");
    let parsed: RawPresets = serde_json::from_str(raw).expect("valid preset tables");
    PresetTables::from_raw(parsed)
});

pub fn presets() -> &'static PresetTables {
    &PRESETS
}

#[derive(Debug, Deserialize)]
struct RawPresets {
    version: String,
    category_ladders: Vec<RawLadder>,
    brand_ladders: Vec<RawLadder>,
}

#[derive(Debug, Deserialize)]
struct RawLadder {
    id: String,
    keywords: Vec<String>,
    unit: ServingUnit,
    #[serde(default)]
    per_unit: Option<PerUnit>,
    options: Vec<PresetOption>,
}

/// Weight of one countable unit ("egg", "sausage", "slice").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PerUnit {
    pub noun: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetOption {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug)]
pub struct PresetLadder {
    pub id: String,
    keywords: WordSet,
    pub unit: ServingUnit,
    pub per_unit: Option<PerUnit>,
    pub options: Vec<PresetOption>,
}

impl PresetLadder {
    fn from_raw(raw: RawLadder) -> Self {
        Self {
            keywords: WordSet::new(&raw.keywords),
            id: raw.id,
            unit: raw.unit,
            per_unit: raw.per_unit,
            options: raw.options,
        }
    }

    /// Length of the longest keyword hit in `text`, if any.
    fn hit_len(&self, text: &str) -> Option<usize> {
        self.keywords.longest_match(text).map(str::len)
    }

    /// Does this ladder count units named `noun` (singular)?
    pub fn counts(&self, noun: &str) -> bool {
        self.per_unit.as_ref().is_some_and(|u| u.noun == noun)
    }
}

#[derive(Debug)]
pub struct PresetTables {
    pub version: String,
    pub category: Vec<PresetLadder>,
    pub brand: Vec<PresetLadder>,
}

impl PresetTables {
    fn from_raw(raw: RawPresets) -> Self {
        Self {
            version: raw.version,
            category: raw.category_ladders.into_iter().map(PresetLadder::from_raw).collect(),
            brand: raw.brand_ladders.into_iter().map(PresetLadder::from_raw).collect(),
        }
    }

    /// Category ladder for an atomic food.
    pub fn category_for<'a>(&'a self, texts: &[&str]) -> Option<&'a PresetLadder> {
        best_ladder(&self.category, texts)
    }

    /// Brand ladder for a branded product.
    pub fn brand_for<'a>(&'a self, texts: &[&str]) -> Option<&'a PresetLadder> {
        best_ladder(&self.brand, texts)
    }

    /// Category ladder counting `noun` units, if any.
    pub fn counting(&self, noun: &str) -> Option<&PresetLadder> {
        self.category.iter().find(|l| l.counts(noun))
    }
}

/// Longest keyword hit across all `texts`; first ladder wins ties.
fn best_ladder<'a>(ladders: &'a [PresetLadder], texts: &[&str]) -> Option<&'a PresetLadder> {
    let mut best: Option<(&PresetLadder, usize)> = None;
    for ladder in ladders {
        let hit = texts.iter().filter_map(|t| ladder.hit_len(t)).max();
        if let Some(len) = hit {
            if best.map_or(true, |(_, b)| len > b) {
                best = Some((ladder, len));
            }
        }
    }
    best.map(|(l, _)| l)
}
