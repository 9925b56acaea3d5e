// src/portions/mod.rs
//! Portion generation: turns a confidence decision into presentable options.
//!
//! - safe output → generic magnitude-only ladder (100g … 300g / ml); a branded
//!   item with a real pack size gets a single pack option instead
//! - confident   → brand or category preset ladder, else the pack size, else
//!   the safe ladder
//!
//! The first option is the default selection. Never empty while the safe
//! ladder is configured.

pub mod presets;
pub mod quantity;

use serde::Serialize;

use crate::classify::{normalize, Classification, ServingConfidence};
use crate::item::{MatchedItem, ServingUnit};
use presets::{presets, PresetLadder};
use quantity::{parse_stated_quantity, pluralize, StatedQuantity};

pub const DEFAULT_SAFE_AMOUNTS: [f64; 5] = [100.0, 150.0, 200.0, 250.0, 300.0];

/// One presentable serving choice. Created fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortionOption {
    pub name: String,
    pub serving_amount: f64,
    pub unit: ServingUnit,
    /// Derived from the item's per-100 calories; not authoritative.
    pub implied_calories: f64,
}

impl PortionOption {
    fn new(name: impl Into<String>, amount: f64, unit: ServingUnit, item: &MatchedItem) -> Self {
        Self {
            name: name.into(),
            serving_amount: amount,
            unit,
            implied_calories: implied_calories(item.calories(), amount),
        }
    }
}

/// kcal for `amount` given kcal per 100, rounded to one decimal.
pub fn implied_calories(per_100: f64, amount: f64) -> f64 {
    let raw = per_100 * (amount / 100.0);
    if raw.is_finite() {
        (raw * 10.0).round() / 10.0
    } else {
        0.0
    }
}

/// "100", "37.5" — whole numbers without a trailing ".0".
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        let s = format!("{amount:.1}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[derive(Debug, Clone)]
pub struct PortionGenerator {
    safe_amounts: Vec<f64>,
    honor_stated_quantity: bool,
}

impl Default for PortionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAFE_AMOUNTS.to_vec(), false)
    }
}

impl PortionGenerator {
    /// Non-positive / non-finite amounts are dropped; an empty result falls
    /// back to the default ladder.
    pub fn new(safe_amounts: Vec<f64>, honor_stated_quantity: bool) -> Self {
        let mut amounts: Vec<f64> = safe_amounts
            .into_iter()
            .filter(|a| a.is_finite() && *a > 0.0)
            .collect();
        if amounts.is_empty() {
            amounts = DEFAULT_SAFE_AMOUNTS.to_vec();
        }
        Self {
            safe_amounts: amounts,
            honor_stated_quantity,
        }
    }

    pub fn honors_stated_quantity(&self) -> bool {
        self.honor_stated_quantity
    }

    /// Generic, magnitude-only ladder in the item's unit.
    pub fn safe_portions(&self, item: &MatchedItem) -> Vec<PortionOption> {
        let unit = item.unit();
        self.safe_amounts
            .iter()
            .map(|&a| PortionOption::new(format!("{}{}", format_amount(a), unit.suffix()), a, unit, item))
            .collect()
    }

    /// Portions for a decided item, ignoring any count in the query.
    pub fn generate(&self, item: &MatchedItem, confidence: &ServingConfidence) -> Vec<PortionOption> {
        let name = normalize(&item.name);
        let brand = item.brand.as_deref().map(normalize).unwrap_or_default();
        let texts = [name.as_str(), brand.as_str()];
        let tables = presets();
        let branded = confidence.classification() == Classification::BrandedPackaged;

        if confidence.uses_safe_output() {
            // Brand ladder labels may carry size words, so only the pack itself.
            if branded {
                if let Some(pack) = pack_portion(item) {
                    return vec![pack];
                }
            }
            return self.safe_portions(item);
        }

        if branded {
            if let Some(ladder) = tables.brand_for(&texts) {
                return ladder_portions(ladder, item);
            }
            if let Some(pack) = pack_portion(item) {
                return vec![pack];
            }
            return self.safe_portions(item);
        }

        match tables.category_for(&texts) {
            Some(ladder) => ladder_portions(ladder, item),
            None => self.safe_portions(item),
        }
    }

    /// Full generation including stated-quantity handling.
    ///
    /// With `honor_stated_quantity` off the stated count is ignored and the
    /// regular ladder is returned. With it on, a count whose noun has a known
    /// per-unit weight yields exactly one option for that count (composite
    /// dishes excluded).
    pub fn generate_for_query(
        &self,
        query: &str,
        item: &MatchedItem,
        confidence: &ServingConfidence,
    ) -> Vec<PortionOption> {
        if self.honor_stated_quantity && confidence.classification() != Classification::CompositeDish {
            if let Some(q) = parse_stated_quantity(&normalize(query)) {
                if let Some(option) = counted_portion(&q, item) {
                    return vec![option];
                }
            }
        }
        self.generate(item, confidence)
    }
}

/// Preset ladder in table order. A real pack size missing from the ladder is
/// put first.
fn ladder_portions(ladder: &PresetLadder, item: &MatchedItem) -> Vec<PortionOption> {
    let suffix = ladder.unit.suffix();
    let mut out: Vec<PortionOption> = ladder
        .options
        .iter()
        .map(|o| {
            PortionOption::new(
                format!("{} ({}{})", o.name, format_amount(o.amount), suffix),
                o.amount,
                ladder.unit,
                item,
            )
        })
        .collect();

    if let Some(size) = item.pack_size() {
        let listed = ladder.options.iter().any(|o| (o.amount - size).abs() < 0.5);
        if !listed {
            out.insert(
                0,
                PortionOption::new(
                    format!("1 pack ({}{})", format_amount(size), suffix),
                    size,
                    ladder.unit,
                    item,
                ),
            );
        }
    }
    out
}

fn pack_portion(item: &MatchedItem) -> Option<PortionOption> {
    let size = item.pack_size()?;
    let unit = item.unit();
    Some(PortionOption::new(
        format!("1 pack ({}{})", format_amount(size), unit.suffix()),
        size,
        unit,
        item,
    ))
}

fn counted_portion(q: &StatedQuantity, item: &MatchedItem) -> Option<PortionOption> {
    let ladder = presets().counting(&q.noun)?;
    let per_unit = ladder.per_unit.as_ref()?;
    let amount = per_unit.amount * f64::from(q.count);
    Some(PortionOption::new(
        format!(
            "{} {} ({}{})",
            q.count,
            pluralize(&per_unit.noun, q.count),
            format_amount(amount),
            ladder.unit.suffix()
        ),
        amount,
        ladder.unit,
        item,
    ))
}

/// Stated count in `query`, for reasons/diagnostics.
pub fn stated_quantity(query: &str) -> Option<StatedQuantity> {
    parse_stated_quantity(&normalize(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ConfidenceScorer;

    fn decide(query: &str, item: &MatchedItem) -> ServingConfidence {
        ConfidenceScorer::default().score(query, item)
    }

    fn names(v: &[PortionOption]) -> Vec<&str> {
        v.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn safe_ladder_is_magnitude_only() {
        let item = MatchedItem::new("Salmon", 208.0);
        let out = PortionGenerator::default().generate(&item, &decide("salmon", &item));
        assert_eq!(names(&out), vec!["100g", "150g", "200g", "250g", "300g"]);
        assert!((out[1].implied_calories - 312.0).abs() < 1e-9);
    }

    #[test]
    fn safe_ladder_uses_ml_for_liquids() {
        let item = MatchedItem::new("Milk", 46.0);
        let out = PortionGenerator::default().generate(&item, &decide("milk", &item));
        assert_eq!(out[0].name, "100ml");
        assert_eq!(out[0].unit, ServingUnit::Millilitres);
    }

    #[test]
    fn confident_atomic_gets_category_ladder() {
        let item = MatchedItem::new("Salmon Fillet", 208.0).verified(true);
        let out = PortionGenerator::default().generate(&item, &decide("salmon fillet", &item));
        assert_eq!(
            names(&out),
            vec![
                "Small fillet (100g)",
                "Medium fillet (140g)",
                "Large fillet (180g)",
                "Extra-large fillet (220g)"
            ]
        );
    }

    #[test]
    fn confident_atomic_without_ladder_falls_back_to_safe() {
        let item = MatchedItem::new("Tofu Block", 144.0).verified(true);
        let c = decide("tofu block", &item);
        assert!(!c.uses_safe_output());
        let out = PortionGenerator::default().generate(&item, &c);
        assert_eq!(out[0].name, "100g");
    }

    #[test]
    fn brand_ladder_and_pack_size() {
        let item = MatchedItem::new("Mars Bar", 449.0);
        let out = PortionGenerator::default().generate(&item, &decide("mars bar", &item));
        assert_eq!(out[0].name, "Fun Size (18g)");
        assert_eq!(out.len(), 4);

        // Pack size already on the ladder → no extra option.
        let item = MatchedItem::new("Mars Bar", 449.0).serving_size(51.0);
        let out = PortionGenerator::default().generate(&item, &decide("mars bar", &item));
        assert_eq!(out.len(), 4);

        // Unlisted pack size → listed first.
        let item = MatchedItem::new("Mars Bar Multipack", 449.0).serving_size(39.4);
        let out = PortionGenerator::default().generate(&item, &decide("mars bar multipack", &item));
        assert_eq!(out[0].name, "1 pack (39.4g)");
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn packaged_with_pack_size_gets_single_pack_option() {
        let item = MatchedItem::new("Tinned Tuna", 110.0).serving_size(145.0);
        let out = PortionGenerator::default().generate(&item, &decide("tinned tuna", &item));
        assert_eq!(names(&out), vec!["1 pack (145g)"]);
        assert!((out[0].implied_calories - 159.5).abs() < 1e-9);
    }

    #[test]
    fn branded_safe_exception_prefers_pack() {
        let item = MatchedItem::new("Frozen Peas", 66.0).serving_size(800.0);
        let c = ServingConfidence::new(Classification::BrandedPackaged, 0.35, true);
        let out = PortionGenerator::default().generate(&item, &c);
        assert_eq!(names(&out), vec!["1 pack (800g)"]);
    }

    #[test]
    fn stated_quantity_ignored_by_default() {
        let item = MatchedItem::new("Pork Sausages", 250.0).verified(true);
        let c = decide("2 sausages", &item);
        let out = PortionGenerator::default().generate_for_query("2 sausages", &item, &c);
        assert!(out.len() > 1);
        assert_eq!(stated_quantity("2 sausages").map(|q| q.count), Some(2));
    }

    #[test]
    fn stated_quantity_honored_when_enabled() {
        let item = MatchedItem::new("Pork Sausages", 250.0);
        let c = decide("2 sausages", &item);
        let g = PortionGenerator::new(DEFAULT_SAFE_AMOUNTS.to_vec(), true);
        let out = g.generate_for_query("2 sausages", &item, &c);
        assert_eq!(names(&out), vec!["2 sausages (114g)"]);
        assert!((out[0].implied_calories - 285.0).abs() < 1e-9);

        // Unknown unit noun → regular generation.
        let out = g.generate_for_query("2 scoops", &item, &c);
        assert!(out.len() > 1);
    }

    #[test]
    fn invalid_safe_amounts_fall_back() {
        let g = PortionGenerator::new(vec![f64::NAN, -5.0, 0.0], false);
        let item = MatchedItem::new("Rice", 130.0);
        assert_eq!(g.safe_portions(&item).len(), DEFAULT_SAFE_AMOUNTS.len());

        let g = PortionGenerator::new(vec![50.0, 75.5], false);
        assert_eq!(names(&g.safe_portions(&item)), vec!["50g", "75.5g"]);
    }

    #[test]
    fn zero_calorie_item_is_fine() {
        let item = MatchedItem::new("Water", 0.0);
        let out = PortionGenerator::default().generate(&item, &decide("water", &item));
        assert!(!out.is_empty());
        assert!(out.iter().all(|p| p.implied_calories == 0.0));
    }

    #[test]
    fn format_amount_trims() {
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(37.5), "37.5");
        assert_eq!(format_amount(39.44), "39.4");
    }
}
