//! Confidence scorer — strictly ordered, first-match-wins decision pipeline.
//!
//! Stages run top to bottom; each either returns a final [`ServingConfidence`]
//! or falls through:
//! 1) composite dish     → CompositeDish, 0.90, safe
//! 2) packaged / branded → BrandedPackaged (0.95 with pack size, 0.35 without; 0.85 for known brands)
//! 3) ambiguous query    → Ambiguous, 0.20, safe
//! 4) atomic fallback    → AtomicRaw / AtomicPrepared, base 0.5 ± factors, safe below threshold
//!
//! Composite detection runs first so "salmon en croute" never reaches the
//! atomic stage as plain salmon.

use super::detectors::{
    ambiguity_rule, brand_family, composite_match, has_form_factor_qualifier,
    has_packaged_format_indicator, has_preparation_method, is_known_branded_product, normalize,
};
use super::{clamp01, Classification, ServingConfidence};
use crate::item::MatchedItem;

pub const DEFAULT_HIGH_CONFIDENCE_THRESHOLD: f32 = 0.7;

const COMPOSITE_SCORE: f32 = 0.90;
const PACKAGED_WITH_PACK_SCORE: f32 = 0.95;
const PACKAGED_NO_PACK_SCORE: f32 = 0.35;
const KNOWN_BRAND_SCORE: f32 = 0.85;
const AMBIGUOUS_SCORE: f32 = 0.20;

const ATOMIC_BASE: f32 = 0.5;
const FORM_FACTOR_BOOST: f32 = 0.2;
const VERIFIED_BOOST: f32 = 0.1;
const EXACT_MATCH_BOOST: f32 = 0.2;
const SHORT_QUERY_PENALTY: f32 = -0.1;
const SHORT_QUERY_CHARS: usize = 10;

/// Normalized view of one (query, item) pair, computed once per call.
#[derive(Debug)]
pub struct Signals<'a> {
    pub query: String,
    pub name: String,
    /// Normalized `item.brand`, empty when absent.
    pub brand: String,
    pub item: &'a MatchedItem,
}

impl<'a> Signals<'a> {
    pub fn new(query: &str, item: &'a MatchedItem) -> Self {
        Self {
            query: normalize(query),
            name: normalize(&item.name),
            brand: item.brand.as_deref().map(normalize).unwrap_or_default(),
            item,
        }
    }
}

/// Identifies which stage produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Composite,
    PackagedOrBranded,
    Ambiguity,
    Atomic,
}

type StageFn = fn(&Signals<'_>) -> Option<ServingConfidence>;

/// Short-circuiting stages, in precedence order. The atomic stage is total and
/// runs only when all of these fall through.
const STAGES: [(Stage, StageFn); 3] = [
    (Stage::Composite, composite_stage),
    (Stage::PackagedOrBranded, packaged_stage),
    (Stage::Ambiguity, ambiguity_stage),
];

#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    high_confidence_threshold: f32,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_CONFIDENCE_THRESHOLD)
    }
}

impl ConfidenceScorer {
    pub fn new(high_confidence_threshold: f32) -> Self {
        let t = if high_confidence_threshold.is_finite() {
            clamp01(high_confidence_threshold)
        } else {
            DEFAULT_HIGH_CONFIDENCE_THRESHOLD
        };
        Self {
            high_confidence_threshold: t,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.high_confidence_threshold
    }

    /// Run the full pipeline.
    pub fn score(&self, query: &str, item: &MatchedItem) -> ServingConfidence {
        self.score_signals(&Signals::new(query, item)).1
    }

    /// Run the pipeline on precomputed signals and report the deciding stage.
    pub fn score_signals(&self, s: &Signals<'_>) -> (Stage, ServingConfidence) {
        for (stage, run) in STAGES {
            if let Some(decided) = run(s) {
                return (stage, decided);
            }
        }
        (Stage::Atomic, self.atomic_stage(s))
    }

    /// Stage 4: atomic fallback with additive confidence factors.
    pub fn atomic_stage(&self, s: &Signals<'_>) -> ServingConfidence {
        let prepared = has_preparation_method(&s.name) || has_preparation_method(&s.query);
        let classification = if prepared {
            Classification::AtomicPrepared
        } else {
            Classification::AtomicRaw
        };

        let mut reasons = Vec::new();
        let mut score = ATOMIC_BASE;
        reasons.push(format!("atomic base {ATOMIC_BASE:.2}"));
        if prepared {
            reasons.push("preparation method present".to_string());
        }

        if has_form_factor_qualifier(&s.query) {
            score += FORM_FACTOR_BOOST;
            reasons.push(format!("form factor in query ({FORM_FACTOR_BOOST:+.2})"));
        }
        if s.item.verified {
            score += VERIFIED_BOOST;
            reasons.push(format!("verified item ({VERIFIED_BOOST:+.2})"));
        }
        if !s.query.is_empty() && s.query == s.name {
            score += EXACT_MATCH_BOOST;
            reasons.push(format!("exact name match ({EXACT_MATCH_BOOST:+.2})"));
        }
        if s.query.chars().count() < SHORT_QUERY_CHARS {
            score += SHORT_QUERY_PENALTY;
            reasons.push(format!(
                "short query <{SHORT_QUERY_CHARS} chars ({SHORT_QUERY_PENALTY:+.2})"
            ));
        }

        // Round to hundredths so the threshold comparison is exact for table values.
        let score = clamp01((score * 100.0).round() / 100.0);
        let safe = score < self.high_confidence_threshold;
        reasons.push(if safe {
            format!("score {score:.2} below threshold {:.2}", self.high_confidence_threshold)
        } else {
            format!("score {score:.2} meets threshold {:.2}", self.high_confidence_threshold)
        });

        let mut out = ServingConfidence::new(classification, score, safe);
        for r in reasons {
            out.push_reason(r);
        }
        out
    }
}

/// Stage 1: composite indicator in the item name or the raw query.
fn composite_stage(s: &Signals<'_>) -> Option<ServingConfidence> {
    let (phrase, place) = composite_match(&s.name)
        .map(|p| (p, "name"))
        .or_else(|| composite_match(&s.query).map(|p| (p, "query")))?;

    Some(
        ServingConfidence::new(Classification::CompositeDish, COMPOSITE_SCORE, true)
            .with_reason(format!("composite indicator '{phrase}' in {place}")),
    )
}

/// Stage 2: packaging word first, then known brand.
fn packaged_stage(s: &Signals<'_>) -> Option<ServingConfidence> {
    if has_packaged_format_indicator(&s.name) || has_packaged_format_indicator(&s.query) {
        let c = match s.item.pack_size() {
            Some(size) => ServingConfidence::new(
                Classification::BrandedPackaged,
                PACKAGED_WITH_PACK_SCORE,
                false,
            )
            .with_reason("packaging format indicator")
            .with_reason(format!("known pack size {size}")),
            None => ServingConfidence::new(
                Classification::BrandedPackaged,
                PACKAGED_NO_PACK_SCORE,
                true,
            )
            .with_reason("packaging format indicator")
            .with_reason("no known pack size"),
        };
        return Some(c);
    }

    let branded_text = if is_known_branded_product(&s.name) {
        s.name.as_str()
    } else if !s.brand.is_empty() && is_known_branded_product(&s.brand) {
        s.brand.as_str()
    } else {
        return None;
    };

    let family = brand_family(branded_text)
        .map(|f| f.label())
        .unwrap_or("brand");
    Some(
        ServingConfidence::new(Classification::BrandedPackaged, KNOWN_BRAND_SCORE, false)
            .with_reason(format!("known branded product ({family})")),
    )
}

/// Stage 3: vague query.
fn ambiguity_stage(s: &Signals<'_>) -> Option<ServingConfidence> {
    let rule = ambiguity_rule(&s.query, &s.name)?;
    Some(
        ServingConfidence::new(Classification::Ambiguous, AMBIGUOUS_SCORE, true)
            .with_reason(format!("ambiguous: {}", rule.describe())),
    )
}
