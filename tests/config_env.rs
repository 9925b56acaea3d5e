// tests/config_env.rs
//
// Config resolution touches process-wide env and CWD, so every test here is
// serialized.

use serving_confidence::config::{
    EngineConfig, ENV_ENGINE_CONFIG_PATH, ENV_HIGH_CONFIDENCE_THRESHOLD,
};
use serving_confidence::{MatchedItem, ServingEngine};
use std::{env, fs};

fn clear_env() {
    env::remove_var(ENV_ENGINE_CONFIG_PATH);
    env::remove_var(ENV_HIGH_CONFIDENCE_THRESHOLD);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing at all → defaults
    let cfg = EngineConfig::from_toml().unwrap();
    assert_eq!(cfg, EngineConfig::default());

    // 2) Fallback ./config/engine.toml
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/engine.toml"),
        "high_confidence_threshold = 0.8\nhonor_stated_quantity = true\n",
    )
    .unwrap();
    let cfg = EngineConfig::from_toml().unwrap();
    assert!((cfg.high_confidence_threshold - 0.8).abs() < 1e-6);
    assert!(cfg.honor_stated_quantity);

    // 3) Explicit env path wins over the fallback
    let p = tmp.path().join("custom.toml");
    fs::write(&p, "safe_amounts = [25, 50]\n").unwrap();
    env::set_var(ENV_ENGINE_CONFIG_PATH, &p);
    let cfg = EngineConfig::from_toml().unwrap();
    assert_eq!(cfg.safe_amounts, vec![25.0, 50.0]);
    assert!(!cfg.honor_stated_quantity);

    clear_env();
    env::set_current_dir(old).unwrap();
}

#[serial_test::serial]
#[test]
fn missing_env_path_is_an_error() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    env::set_var(ENV_ENGINE_CONFIG_PATH, tmp.path().join("nope.toml"));

    let err = EngineConfig::from_toml().unwrap_err();
    assert!(err.to_string().contains(ENV_ENGINE_CONFIG_PATH), "{err:#}");

    clear_env();
}

#[serial_test::serial]
#[test]
fn malformed_file_reports_its_path() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("broken.toml");
    fs::write(&p, "high_confidence_threshold = [").unwrap();
    env::set_var(ENV_ENGINE_CONFIG_PATH, &p);

    let err = EngineConfig::from_toml().unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"), "{err:#}");

    clear_env();
}

#[serial_test::serial]
#[test]
fn threshold_env_overrides_file_and_reaches_engine() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("engine.toml");
    fs::write(&p, "high_confidence_threshold = 0.5\n").unwrap();
    env::set_var(ENV_ENGINE_CONFIG_PATH, &p);
    env::set_var(ENV_HIGH_CONFIDENCE_THRESHOLD, "0.95");

    let engine = ServingEngine::from_env().unwrap();
    assert!((engine.threshold() - 0.95).abs() < 1e-6);

    // 0.5 + 0.2 (form factor) + 0.2 (exact) = 0.9 < 0.95 → safe.
    let item = MatchedItem::new("Chicken Breast", 106.0);
    let out = engine.classify_and_get_portions("chicken breast", &item);
    assert!(out.confidence.uses_safe_output());
    assert_eq!(out.portions[0].name, "100g");

    // Garbage override is ignored; the file value stands.
    env::set_var(ENV_HIGH_CONFIDENCE_THRESHOLD, "very high");
    let cfg = EngineConfig::from_toml().unwrap();
    assert!((cfg.high_confidence_threshold - 0.5).abs() < 1e-6);

    clear_env();
}
