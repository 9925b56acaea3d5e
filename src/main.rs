//! Serving-confidence service — binary entrypoint.
//! Boots the Axum HTTP server with the classification engine, Prometheus
//! metrics and CORS.

use serving_confidence::devlog::{is_dev_env, ENV_DEV_LOG};
use serving_confidence::metrics::Metrics;
use serving_confidence::{create_router, AppState, ServingEngine};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SERVING_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var(ENV_DEV_LOG)
        .ok()
        .is_some_and(|v| v == "1");

    if !(dev_flag && is_dev_env()) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("serving=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let engine = ServingEngine::from_env()?;
    tracing::info!(threshold = engine.threshold(), "serving engine ready");

    let metrics = Metrics::init()?;
    let router = create_router(AppState::new(engine)).merge(metrics.router());

    Ok(router.into())
}
