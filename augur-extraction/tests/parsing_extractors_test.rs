//! Tests for the log, workflow, discussion, scan, and derived extractors.

mod common;

use augur_core::types::FeatureValue;
use augur_extraction::context::ExecutionContext;
use augur_extraction::extractors::{derived, discussion, logs, scan, workflow, FeatureExtractor};
use augur_extraction::resources::handle::{
    BuildLogs, LogFile, RepoSettings, ResourceHandle, ScanReports,
};
use augur_extraction::resources::spec::names as resource;
use augur_extraction::resources::ScanReport;

const JUNIT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="unit" tests="10" failures="2" errors="1" skipped="1" time="3.5">
    <testcase name="a"/>
  </testsuite>
  <testsuite name="integration" tests="5" failures="0" errors="0" skipped="0" time="1.5"/>
</testsuites>
"#;

const RAW_LOG: &str = "\
starting build
compiling widgets v0.1.0
error[E0308]: mismatched types
##[error]Process completed with exit code 1.
done
";

fn ctx_with(workdir: &std::path::Path, name: &str, handle: ResourceHandle) -> ExecutionContext {
    let mut ctx = common::context(workdir);
    ctx.set_resource(name, handle);
    ctx
}

#[test]
fn test_logs_extractor_prefers_junit_reports() {
    let dir = tempfile::tempdir().unwrap();
    let handle = ResourceHandle::BuildLogs(BuildLogs {
        files: vec![
            LogFile {
                name: "junit.xml".into(),
                content: JUNIT_XML.into(),
            },
            LogFile {
                name: "step1.txt".into(),
                content: RAW_LOG.into(),
            },
        ],
    });
    let ctx = ctx_with(dir.path(), resource::BUILD_LOGS, handle);

    let features = logs::LogsExtractor.extract(&ctx).unwrap();

    assert_eq!(features[logs::TESTS_RUN], FeatureValue::Int(15));
    // failures + errors across suites.
    assert_eq!(features[logs::TESTS_FAILED], FeatureValue::Int(3));
    assert_eq!(features[logs::TESTS_SKIPPED], FeatureValue::Int(1));
    assert_eq!(features[logs::TEST_DURATION_SECS], FeatureValue::Float(5.0));
    // Two raw lines carry error markers; the XML file is not scanned.
    assert_eq!(features[logs::LOG_ERROR_LINES], FeatureValue::Int(2));
}

#[test]
fn test_logs_extractor_falls_back_to_text_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let handle = ResourceHandle::BuildLogs(BuildLogs {
        files: vec![LogFile {
            name: "step1.txt".into(),
            content: "running suite\n12 passed\n3 failed\n".into(),
        }],
    });
    let ctx = ctx_with(dir.path(), resource::BUILD_LOGS, handle);

    let features = logs::LogsExtractor.extract(&ctx).unwrap();

    assert_eq!(features[logs::TESTS_RUN], FeatureValue::Int(15));
    assert_eq!(features[logs::TESTS_FAILED], FeatureValue::Int(3));
}

#[test]
fn test_logs_extractor_rejects_malformed_junit() {
    let dir = tempfile::tempdir().unwrap();
    let handle = ResourceHandle::BuildLogs(BuildLogs {
        files: vec![LogFile {
            name: "junit.xml".into(),
            content: "<testsuite tests=\"3\"".into(),
        }],
    });
    let ctx = ctx_with(dir.path(), resource::BUILD_LOGS, handle);

    assert!(logs::LogsExtractor.extract(&ctx).is_err());
}

#[test]
fn test_workflow_extractor_parses_actions_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    // Re-seed repo_config with a workflow definition.
    let yaml = r#"
name: ci
on:
  push: {}
  schedule:
    - cron: "0 4 * * *"
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/cache@v4
      - run: cargo test
  lint:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo clippy
"#;
    ctx = ExecutionContext::new(
        ctx.repo.clone(),
        ctx.build.clone(),
        RepoSettings {
            workflow_yaml: Some(yaml.to_string()),
            language: Some("rust".into()),
        },
        dir.path().to_path_buf(),
    );

    let features = workflow::WorkflowExtractor.extract(&ctx).unwrap();

    assert_eq!(features[workflow::JOB_COUNT], FeatureValue::Int(2));
    assert_eq!(features[workflow::STEP_COUNT], FeatureValue::Int(5));
    assert_eq!(features[workflow::ON_SCHEDULE], FeatureValue::Bool(true));
    assert_eq!(features[workflow::USES_CACHE], FeatureValue::Bool(true));
}

#[test]
fn test_workflow_extractor_requires_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(dir.path());
    assert!(workflow::WorkflowExtractor.extract(&ctx).is_err());
}

#[test]
fn test_discussion_extractor_reads_client_data() {
    let dir = tempfile::tempdir().unwrap();
    let client = std::sync::Arc::new(common::FakeGithubClient::default());
    let ctx = ctx_with(dir.path(), resource::GITHUB_API, ResourceHandle::GithubApi(client));

    let features = discussion::DiscussionExtractor.extract(&ctx).unwrap();

    assert_eq!(features[discussion::COMMENT_COUNT], FeatureValue::Int(4));
    assert_eq!(features[discussion::REVIEW_COUNT], FeatureValue::Int(2));
    assert_eq!(
        features[discussion::TIME_TO_FIRST_REVIEW_SECS],
        FeatureValue::Int(3600)
    );
}

#[test]
fn test_scan_extractor_sums_reports() {
    let dir = tempfile::tempdir().unwrap();
    let handle = ResourceHandle::ScanReports(ScanReports {
        reports: vec![
            ScanReport {
                tool: "trivy".into(),
                critical: 1,
                high: 2,
                medium: 0,
                low: 4,
                code_smells: 0,
            },
            ScanReport {
                tool: "sonar".into(),
                critical: 0,
                high: 1,
                medium: 3,
                low: 0,
                code_smells: 17,
            },
        ],
    });
    let ctx = ctx_with(dir.path(), resource::SCAN_REPORTS, handle);

    let features = scan::ScanExtractor.extract(&ctx).unwrap();

    assert_eq!(features[scan::CRITICAL], FeatureValue::Int(1));
    assert_eq!(features[scan::HIGH], FeatureValue::Int(3));
    assert_eq!(features[scan::MEDIUM], FeatureValue::Int(3));
    assert_eq!(features[scan::LOW], FeatureValue::Int(4));
    assert_eq!(features[scan::CODE_SMELLS], FeatureValue::Int(17));
    assert_eq!(features[scan::TOOLS_REPORTING], FeatureValue::Int(2));
}

#[test]
fn test_derived_extractor_computes_ratios() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    ctx.insert_feature(logs::TESTS_RUN, FeatureValue::Int(20));
    ctx.insert_feature(logs::TESTS_FAILED, FeatureValue::Int(5));
    ctx.insert_feature("commit_lines_added", FeatureValue::Int(30));
    ctx.insert_feature("commit_lines_deleted", FeatureValue::Int(20));

    let features = derived::DerivedExtractor.extract(&ctx).unwrap();

    assert_eq!(
        features[derived::TEST_FAILURE_RATE],
        FeatureValue::Float(0.25)
    );
    assert_eq!(features[derived::CHANGE_CHURN], FeatureValue::Float(50.0));
    assert_eq!(features[derived::FAILURE_DENSITY], FeatureValue::Float(0.1));
}

#[test]
fn test_derived_extractor_handles_defaulted_upstream() {
    // All upstream features at their neutral defaults: ratios stay finite.
    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(dir.path());

    let features = derived::DerivedExtractor.extract(&ctx).unwrap();

    assert_eq!(features[derived::TEST_FAILURE_RATE], FeatureValue::Float(0.0));
    assert_eq!(features[derived::CHANGE_CHURN], FeatureValue::Float(0.0));
    assert_eq!(features[derived::FAILURE_DENSITY], FeatureValue::Float(0.0));
}
