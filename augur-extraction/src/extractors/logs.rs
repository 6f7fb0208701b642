//! Logs extractor — test outcomes and error density from build step logs.
//!
//! JUnit XML reports are the primary source for test counts; raw logs are
//! scanned for error markers and, when no report is present, for textual
//! test summaries.

use std::sync::OnceLock;

use aho_corasick::AhoCorasick;
use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::handle::{BuildLogs, LogFile, ResourceHandle};
use crate::resources::spec::names as resource;

pub const TESTS_RUN: &str = "tests_run";
pub const TESTS_FAILED: &str = "tests_failed";
pub const TESTS_SKIPPED: &str = "tests_skipped";
pub const TEST_DURATION_SECS: &str = "test_duration_secs";
pub const LOG_ERROR_LINES: &str = "log_error_lines";
pub const LOG_BYTES: &str = "log_bytes";

fn error_markers() -> &'static AhoCorasick {
    static MARKERS: OnceLock<AhoCorasick> = OnceLock::new();
    MARKERS.get_or_init(|| {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(["error", "exception", "panic", "fatal", "##[error]"])
            .expect("static marker patterns are valid")
    })
}

fn passed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s+(?:tests?\s+)?(?:passed|passing)")
            .expect("static summary pattern is valid")
    })
}

fn failed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s+(?:tests?\s+)?(?:failed|failing)")
            .expect("static summary pattern is valid")
    })
}

#[derive(Default)]
struct TestTotals {
    run: i64,
    failed: i64,
    skipped: i64,
    duration_secs: f64,
}

/// Accumulate `<testsuite>` attributes from one JUnit report.
fn parse_junit(extractor: &str, file: &LogFile, totals: &mut TestTotals) -> Result<(), ExtractError> {
    let mut reader = Reader::from_str(&file.content);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"testsuite" {
                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value);
                        match attr.key.as_ref() {
                            b"tests" => totals.run += value.parse::<i64>().unwrap_or(0),
                            b"failures" | b"errors" => {
                                totals.failed += value.parse::<i64>().unwrap_or(0)
                            }
                            b"skipped" => totals.skipped += value.parse::<i64>().unwrap_or(0),
                            b"time" => totals.duration_secs += value.parse::<f64>().unwrap_or(0.0),
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Parse {
                    extractor: extractor.to_string(),
                    what: format!("junit report {}", file.name),
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Textual fallback when no JUnit report is staged.
fn parse_summaries(logs: &BuildLogs, totals: &mut TestTotals) {
    for file in &logs.files {
        for line in file.content.lines() {
            if let Some(caps) = passed_re().captures(line) {
                totals.run += caps[1].parse::<i64>().unwrap_or(0);
            }
            if let Some(caps) = failed_re().captures(line) {
                let failed = caps[1].parse::<i64>().unwrap_or(0);
                totals.failed += failed;
                totals.run += failed;
            }
        }
    }
}

pub struct LogsExtractor;

impl FeatureExtractor for LogsExtractor {
    fn id(&self) -> &str {
        "logs"
    }

    fn group(&self) -> &str {
        "logs"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            TESTS_RUN.to_string(),
            TESTS_FAILED.to_string(),
            TESTS_SKIPPED.to_string(),
            TEST_DURATION_SECS.to_string(),
            LOG_ERROR_LINES.to_string(),
            LOG_BYTES.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::BUILD_LOGS.to_string()]
    }

    fn priority(&self) -> i32 {
        60
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let logs = ctx
            .resource(resource::BUILD_LOGS)
            .and_then(ResourceHandle::as_build_logs)
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "logs".to_string(),
                input: resource::BUILD_LOGS.to_string(),
            })?;

        let mut totals = TestTotals::default();
        let mut saw_report = false;
        for file in &logs.files {
            if file.name.ends_with(".xml") {
                parse_junit(self.id(), file, &mut totals)?;
                saw_report = true;
            }
        }
        if !saw_report {
            parse_summaries(logs, &mut totals);
        }

        let markers = error_markers();
        let mut error_lines: i64 = 0;
        for file in logs.files.iter().filter(|f| !f.name.ends_with(".xml")) {
            error_lines += file
                .content
                .lines()
                .filter(|line| markers.is_match(line))
                .count() as i64;
        }

        let mut features = FxHashMap::default();
        features.insert(TESTS_RUN.to_string(), totals.run.into());
        features.insert(TESTS_FAILED.to_string(), totals.failed.into());
        features.insert(TESTS_SKIPPED.to_string(), totals.skipped.into());
        features.insert(
            TEST_DURATION_SECS.to_string(),
            totals.duration_secs.into(),
        );
        features.insert(LOG_ERROR_LINES.to_string(), error_lines.into());
        features.insert(LOG_BYTES.to_string(), logs.total_bytes().into());
        Ok(features)
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (TESTS_RUN, FeatureValue::Int(0)),
            (TESTS_FAILED, FeatureValue::Int(0)),
            (TESTS_SKIPPED, FeatureValue::Int(0)),
            (TEST_DURATION_SECS, FeatureValue::Float(0.0)),
            (LOG_ERROR_LINES, FeatureValue::Int(0)),
            (LOG_BYTES, FeatureValue::Int(0)),
        ])
    }
}
