//! End-to-end engine tests: builtin registry, real git fixtures, staged
//! logs, fake GitHub client.

mod common;

use std::sync::Arc;

use augur_core::config::AugurConfig;
use augur_core::errors::ExtractionError;
use augur_core::events::EventDispatcher;
use augur_core::types::FeatureValue;
use augur_extraction::engine::{ExtractionEngine, RunInputs};
use augur_extraction::executor::ExtractionStatus;
use augur_extraction::extractors;
use augur_extraction::registry::FeatureRegistry;
use augur_extraction::resources::handle::RepoSettings;
use augur_extraction::resources::ResourceCatalog;

const WORKFLOW_YAML: &str = r#"
name: ci
on: [push]
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo test
"#;

struct Fixture {
    _upstream: tempfile::TempDir,
    _stage: tempfile::TempDir,
    engine: ExtractionEngine,
    inputs: RunInputs,
}

fn fixture(auth_fails: bool, strict: bool) -> Fixture {
    // Unique build ids keep parallel tests out of each other's workdirs.
    static NEXT_BUILD: std::sync::atomic::AtomicI64 = std::sync::atomic::AtomicI64::new(501);
    let build_id = NEXT_BUILD.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    let upstream = tempfile::tempdir().unwrap();
    let shas = common::init_git_repo(upstream.path(), 3);
    let stage = tempfile::tempdir().unwrap();

    let build = common::build_ref(build_id, shas.last().unwrap());
    let log_dir = stage.path().join("logs").join(build.id.to_string());
    std::fs::create_dir_all(&log_dir).unwrap();
    std::fs::write(log_dir.join("step1.txt"), "all good\n7 passed\n").unwrap();

    let mut config = AugurConfig::default();
    config.acquisition.clone_root = Some(stage.path().join("clones"));
    config.acquisition.log_root = Some(stage.path().join("logs"));
    config.acquisition.retry_base_delay_ms = Some(1);
    config.extraction.strict = Some(strict);

    let registry =
        FeatureRegistry::build(extractors::builtin(), &ResourceCatalog::builtin()).unwrap();
    let client = Arc::new(common::FakeGithubClient {
        auth_fails,
        ..Default::default()
    });
    let engine = ExtractionEngine::new(
        registry,
        config,
        Some(client),
        Arc::new(EventDispatcher::new()),
    );

    let inputs = RunInputs {
        repo: common::repo_ref("octo/widgets", upstream.path().to_str().unwrap()),
        build,
        settings: RepoSettings {
            workflow_yaml: Some(WORKFLOW_YAML.to_string()),
            language: Some("rust".into()),
        },
    };

    Fixture {
        _upstream: upstream,
        _stage: stage,
        engine,
        inputs,
    }
}

fn all_feature_names(engine: &ExtractionEngine) -> Vec<String> {
    engine.registry().feature_names()
}

#[test]
fn test_full_run_succeeds() {
    let fx = fixture(false, false);
    let requested = all_feature_names(&fx.engine);

    let result = fx.engine.extract(fx.inputs, &requested).unwrap();

    assert_eq!(result.status, ExtractionStatus::Success);
    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    assert!(result.skipped.is_empty());

    // Spot checks across groups.
    assert!(result.features["commit_files_changed"].as_int().unwrap() > 0);
    assert_eq!(result.features["history_commit_count"], FeatureValue::Int(3));
    assert_eq!(result.features["workflow_job_count"], FeatureValue::Int(1));
    assert_eq!(result.features["tests_run"], FeatureValue::Int(7));
    assert!(result.features["codebase_file_count"].as_int().unwrap() >= 4);
    assert_eq!(result.features["pr_comment_count"], FeatureValue::Int(4));
    assert_eq!(result.features["scan_critical"], FeatureValue::Int(1));
    assert_eq!(result.features["change_churn"].data_type().name(), "float");
}

#[test]
fn test_github_outage_degrades_run() {
    let fx = fixture(true, false);
    let requested = all_feature_names(&fx.engine);

    let result = fx.engine.extract(fx.inputs, &requested).unwrap();

    assert_eq!(result.status, ExtractionStatus::Partial);
    // Git- and log-backed features still computed.
    assert_eq!(result.features["history_commit_count"], FeatureValue::Int(3));
    assert_eq!(result.features["tests_run"], FeatureValue::Int(7));
    // GitHub-backed features fell back to declared defaults.
    assert_eq!(result.features["pr_comment_count"], FeatureValue::Int(0));
    assert_eq!(result.features["scan_critical"], FeatureValue::Int(0));
    assert!(result
        .errors
        .iter()
        .any(|e| e.group == "acquisition" && e.source == "authenticate_github"));
    assert!(!result.skipped.is_empty());
}

#[test]
fn test_strict_mode_aborts_on_acquisition_failure() {
    let fx = fixture(true, true);
    let requested = all_feature_names(&fx.engine);

    let result = fx.engine.extract(fx.inputs, &requested);

    assert!(matches!(result, Err(ExtractionError::Resource(_))));
}

#[test]
fn test_subset_request_plans_only_needed_resources() {
    // Logs-only request: no git clone should be required or attempted.
    let fx = fixture(false, false);
    let requested = vec!["tests_run".to_string(), "log_bytes".to_string()];

    let result = fx.engine.extract(fx.inputs, &requested).unwrap();

    assert_eq!(result.status, ExtractionStatus::Success);
    assert_eq!(result.features["tests_run"], FeatureValue::Int(7));
    // Only the logs extractor ran; no commit features in the vector.
    assert!(!result.features.contains_key("commit_files_changed"));
}

#[test]
fn test_catalog_matches_registry() {
    let fx = fixture(false, false);
    let catalog = fx.engine.catalog();
    let names = all_feature_names(&fx.engine);
    assert_eq!(catalog.len(), names.len());
    for name in names {
        assert!(catalog.iter().any(|e| e.name == name));
    }
}
