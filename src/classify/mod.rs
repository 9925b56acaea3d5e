// src/classify/mod.rs
//! Classification pipeline: indicator tables → detectors → staged scorer.

pub mod detectors;
pub mod indicators;
pub mod scorer;

use serde::Serialize;

pub use detectors::normalize;
pub use indicators::{indicator_version, tables};
pub use scorer::{ConfidenceScorer, Stage, DEFAULT_HIGH_CONFIDENCE_THRESHOLD};

/// Semantic category of a (query, item) pair. Exactly one per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    AtomicRaw,
    AtomicPrepared,
    CompositeDish,
    BrandedPackaged,
    Ambiguous,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::AtomicRaw => "atomic_raw",
            Classification::AtomicPrepared => "atomic_prepared",
            Classification::CompositeDish => "composite_dish",
            Classification::BrandedPackaged => "branded_packaged",
            Classification::Ambiguous => "ambiguous",
        }
    }

    pub fn is_atomic(self) -> bool {
        matches!(self, Classification::AtomicRaw | Classification::AtomicPrepared)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the scorer.
///
/// `uses_safe_output` is fixed by the stage that produced the value (and, for
/// atomic foods, by the score against the high-confidence threshold); there is
/// no setter. `reasons` is explanatory only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServingConfidence {
    classification: Classification,
    /// In <0.0, 1.0>.
    score: f32,
    uses_safe_output: bool,
    reasons: Vec<String>,
}

impl ServingConfidence {
    pub(crate) fn new(classification: Classification, score: f32, uses_safe_output: bool) -> Self {
        Self {
            classification,
            score: clamp01(score),
            uses_safe_output,
            reasons: Vec::new(),
        }
    }

    /// Builder-style reason append.
    pub(crate) fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    pub(crate) fn push_reason(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn uses_safe_output(&self) -> bool {
        self.uses_safe_output
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

pub(crate) fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
