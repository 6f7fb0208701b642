//! Tests for the Augur error handling system.

use augur_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let registry = RegistryError::DuplicateFeature {
        feature: "x".into(),
        first: "a".into(),
        second: "b".into(),
    };
    assert_eq!(registry.error_code(), "DUPLICATE_FEATURE");

    let unknown = RegistryError::UnknownFeature {
        feature: "x".into(),
        required_by: "a".into(),
    };
    assert_eq!(unknown.error_code(), "UNKNOWN_FEATURE");

    let resource = ResourceError::InitializationFailed {
        resource: "git_history".into(),
        message: "boom".into(),
    };
    assert_eq!(resource.error_code(), "RESOURCE_INIT_FAILED");

    let transient = ResourceError::Transient {
        resource: "github_api".into(),
        message: "timeout".into(),
    };
    assert_eq!(transient.error_code(), "RESOURCE_TRANSIENT");

    let extract = ExtractError::Failed {
        extractor: "logs".into(),
        message: "bad".into(),
    };
    assert_eq!(extract.error_code(), "EXTRACT_FAILED");

    let executor = ExecutorError::MissingCoreResource {
        resource: "repo".into(),
        extractor: "commit".into(),
    };
    assert_eq!(executor.error_code(), "MISSING_CORE_RESOURCE");

    let storage = StorageError::DbBusy;
    assert_eq!(storage.error_code(), "DB_BUSY");

    let config = ConfigError::FileNotFound { path: "/tmp".into() };
    assert_eq!(config.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_from_conversions() {
    let registry = RegistryError::CyclicDependency { cycle: "a -> b".into() };
    let top: ExtractionError = registry.into();
    assert!(matches!(top, ExtractionError::Registry(_)));
    assert_eq!(top.error_code(), "CYCLIC_DEPENDENCY");

    let resource = ResourceError::Unavailable {
        resource: "build_logs".into(),
    };
    let top: ExtractionError = resource.into();
    assert!(matches!(top, ExtractionError::Resource(_)));

    let executor = ExecutorError::ContextCorrupted {
        message: "bad".into(),
    };
    let top: ExtractionError = executor.into();
    assert!(matches!(top, ExtractionError::Executor(_)));

    let storage = StorageError::SqliteError {
        message: "locked".into(),
    };
    let top: ExtractionError = storage.into();
    assert!(matches!(top, ExtractionError::Storage(_)));

    let config = ConfigError::ValidationFailed {
        field: "x".into(),
        message: "bad".into(),
    };
    let top: ExtractionError = config.into();
    assert!(matches!(top, ExtractionError::Config(_)));
}

#[test]
fn test_log_string_format() {
    let e = ResourceError::Unavailable {
        resource: "scan_reports".into(),
    };
    assert_eq!(
        e.log_string(),
        "[RESOURCE_UNAVAILABLE] resource 'scan_reports' is unavailable"
    );
}

#[test]
fn test_transient_classification() {
    let transient = ResourceError::Transient {
        resource: "github_api".into(),
        message: "503".into(),
    };
    assert!(transient.is_transient());
    assert_eq!(transient.resource(), Some("github_api"));

    let permanent = ResourceError::InitializationFailed {
        resource: "git_history".into(),
        message: "auth".into(),
    };
    assert!(!permanent.is_transient());

    let lock = ResourceError::LockPoisoned { repo: "o/r".into() };
    assert_eq!(lock.resource(), None);
}

#[test]
fn test_extract_error_extractor_accessor() {
    let e = ExtractError::Parse {
        extractor: "workflow".into(),
        what: "yaml".into(),
        message: "eof".into(),
    };
    assert_eq!(e.extractor(), "workflow");
    assert_eq!(e.error_code(), "EXTRACT_PARSE_FAILED");
}
