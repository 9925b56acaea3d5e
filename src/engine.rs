//! # Serving Engine
//! The single entry point for callers: (query, matched item) → confidence +
//! ordered portion list. Pure and synchronous; no I/O, no shared mutable
//! state, safe to call from any thread.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::classify::{ConfidenceScorer, ServingConfidence};
use crate::config::EngineConfig;
use crate::item::MatchedItem;
use crate::portions::{stated_quantity, PortionGenerator, PortionOption};
use crate::{devlog, metrics};

static DEFAULT_ENGINE: Lazy<ServingEngine> = Lazy::new(ServingEngine::default);

/// Confidence plus the portions it selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPortions {
    pub confidence: ServingConfidence,
    pub portions: Vec<PortionOption>,
}

#[derive(Debug, Clone, Default)]
pub struct ServingEngine {
    scorer: ConfidenceScorer,
    generator: PortionGenerator,
}

impl ServingEngine {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            scorer: ConfidenceScorer::new(cfg.high_confidence_threshold),
            generator: PortionGenerator::new(cfg.safe_amounts.clone(), cfg.honor_stated_quantity),
        }
    }

    /// Build from `EngineConfig::from_toml()` (env + file + defaults).
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(&EngineConfig::from_toml()?))
    }

    pub fn threshold(&self) -> f32 {
        self.scorer.threshold()
    }

    pub fn classify(&self, query: &str, item: &MatchedItem) -> ServingConfidence {
        self.scorer.score(query, item)
    }

    pub fn portions(
        &self,
        query: &str,
        item: &MatchedItem,
        confidence: &ServingConfidence,
    ) -> Vec<PortionOption> {
        self.generator.generate_for_query(query, item, confidence)
    }

    pub fn classify_and_get_portions(&self, query: &str, item: &MatchedItem) -> ClassifiedPortions {
        let mut confidence = self.classify(query, item);

        if let Some(q) = stated_quantity(query) {
            let applied = self.generator.honors_stated_quantity();
            confidence.push_reason(format!(
                "stated quantity {} x {}{}",
                q.count,
                q.noun,
                if applied { "" } else { " (not applied)" }
            ));
        }

        let portions = self.portions(query, item, &confidence);

        metrics::record_classification(&confidence);
        devlog::log_decision(query, &confidence, portions.len());

        ClassifiedPortions {
            confidence,
            portions,
        }
    }
}

/// Classify with the default engine (built-in thresholds and ladders).
pub fn classify_and_get_portions(query: &str, item: &MatchedItem) -> ClassifiedPortions {
    DEFAULT_ENGINE.classify_and_get_portions(query, item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;

    #[test]
    fn default_engine_end_to_end() {
        let item = MatchedItem::new("Salmon en croute", 270.0);
        let out = classify_and_get_portions("salmon en croute", &item);
        assert_eq!(out.confidence.classification(), Classification::CompositeDish);
        assert!(out.confidence.uses_safe_output());
        assert_eq!(out.portions.len(), 5);
    }

    #[test]
    fn stated_quantity_reason_is_recorded() {
        let item = MatchedItem::new("Pork Sausages", 250.0);
        let out = classify_and_get_portions("2 sausages", &item);
        assert!(out
            .confidence
            .reasons()
            .iter()
            .any(|r| r == "stated quantity 2 x sausage (not applied)"));
        assert!(out.portions.len() > 1);

        let engine = ServingEngine::new(&EngineConfig {
            honor_stated_quantity: true,
            ..EngineConfig::default()
        });
        let out = engine.classify_and_get_portions("2 sausages", &item);
        assert_eq!(out.portions.len(), 1);
        assert!(out.confidence.reasons().iter().any(|r| r == "stated quantity 2 x sausage"));
    }

    #[test]
    fn config_threshold_reaches_scorer() {
        let engine = ServingEngine::new(&EngineConfig {
            high_confidence_threshold: 0.9,
            ..EngineConfig::default()
        });
        assert!((engine.threshold() - 0.9).abs() < 1e-6);

        // 0.5 + 0.2 (form factor) + 0.2 (exact) = 0.9 → still confident.
        let item = MatchedItem::new("Chicken Breast", 106.0);
        let out = engine.classify_and_get_portions("chicken breast", &item);
        assert!(!out.confidence.uses_safe_output());
        assert!(out.portions[0].name.starts_with("Small breast"));
    }

    #[test]
    fn serializes_for_callers() {
        let item = MatchedItem::new("Mars Bar", 449.0);
        let v = serde_json::to_value(classify_and_get_portions("mars bar", &item)).unwrap();
        assert_eq!(v["confidence"]["classification"], "branded_packaged");
        assert_eq!(v["portions"][0]["unit"], "g");
        assert!(v["portions"][0]["implied_calories"].is_number());
    }
}
