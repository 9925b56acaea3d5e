// src/devlog.rs
//! Dev-only, anonymized diagnostics for classification decisions.
//!
//! Gate: `SERVING_DEV_LOG=1` AND a dev environment (debug build or
//! `SHUTTLE_ENV` in {local, development, dev}). Raw query text is never
//! logged, only a short SHA-256 prefix.

use tracing::debug;

use crate::classify::ServingConfidence;

pub const ENV_DEV_LOG: &str = "SERVING_DEV_LOG";

pub fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}

pub fn dev_logging_enabled() -> bool {
    std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1") && is_dev_env()
}

/// 12 hex chars of SHA-256 over `text`.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

pub fn log_decision(query: &str, confidence: &ServingConfidence, portions: usize) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(query);
    let reasons = truncate_vec(confidence.reasons(), 5);
    debug!(
        target: "serving",
        %id,
        classification = %confidence.classification(),
        score = confidence.score(),
        safe = confidence.uses_safe_output(),
        portions,
        reasons = ?reasons
    );
}
