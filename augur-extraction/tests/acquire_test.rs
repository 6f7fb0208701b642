//! Tests for the acquisition driver, retry policy, and cleanup ordering.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use augur_core::errors::ResourceError;
use augur_core::events::EventDispatcher;
use augur_extraction::acquire::{AcquisitionDriver, LocalDispatcher};
use augur_extraction::context::ExecutionContext;
use augur_extraction::resolver::resource_plan;
use augur_extraction::resources::handle::{ResourceHandle, ScanReports};
use augur_extraction::resources::providers::{ProviderSet, ResourceProvider};
use augur_extraction::resources::{ResourceCatalog, ResourceSpec, ResourceKind, TaskCatalog, TaskSpec};
use augur_extraction::retry::RetryPolicy;

/// Provider over a synthetic resource; fails a configurable number of times.
struct StubProvider {
    resource: String,
    fail_times: u32,
    transient: bool,
    init_calls: AtomicU32,
    cleanups: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    fn new(resource: &str, cleanups: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            resource: resource.to_string(),
            fail_times: 0,
            transient: false,
            init_calls: AtomicU32::new(0),
            cleanups,
        }
    }

    fn failing(mut self, times: u32, transient: bool) -> Self {
        self.fail_times = times;
        self.transient = transient;
        self
    }
}

impl ResourceProvider for StubProvider {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn initialize(&self, _ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError> {
        let call = self.init_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            return Err(if self.transient {
                ResourceError::Transient {
                    resource: self.resource.clone(),
                    message: "flaky".into(),
                }
            } else {
                ResourceError::InitializationFailed {
                    resource: self.resource.clone(),
                    message: "down".into(),
                }
            });
        }
        Ok(ResourceHandle::ScanReports(ScanReports { reports: Vec::new() }))
    }

    fn cleanup(&self, _ctx: &ExecutionContext) {
        self.cleanups.lock().unwrap().push(self.resource.clone());
    }
}

/// Synthetic two-level catalog: r1/r2 at level 0, r3's task depends on r1's.
fn synthetic_catalogs() -> (ResourceCatalog, TaskCatalog) {
    let mut resources = ResourceCatalog::new();
    resources.insert(ResourceSpec::new("r1", ResourceKind::Acquired).with_task("t1"));
    resources.insert(ResourceSpec::new("r2", ResourceKind::Acquired).with_task("t2"));
    resources.insert(
        ResourceSpec::new("r3", ResourceKind::Acquired)
            .with_task("t3")
            .with_requires("r1"),
    );

    let mut tasks = TaskCatalog::new();
    tasks.insert(TaskSpec::new("t1").yields("r1"));
    tasks.insert(TaskSpec::new("t2").yields("r2"));
    tasks.insert(TaskSpec::new("t3").depends("t1").yields("r3"));
    tasks.validate().unwrap();

    (resources, tasks)
}

struct Fixture {
    driver: AcquisitionDriver,
    providers_cleanups: Arc<Mutex<Vec<String>>>,
    resources: ResourceCatalog,
    tasks: TaskCatalog,
}

fn fixture(make: impl Fn(&Arc<Mutex<Vec<String>>>) -> Vec<StubProvider>) -> Fixture {
    let (resources, tasks) = synthetic_catalogs();
    let cleanups = Arc::new(Mutex::new(Vec::new()));
    let mut set = ProviderSet::new();
    for provider in make(&cleanups) {
        set.register(Arc::new(provider));
    }
    let driver = AcquisitionDriver::new(
        set,
        tasks.clone(),
        RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5)),
        Arc::new(LocalDispatcher::new(2)),
        Arc::new(EventDispatcher::new()),
    );
    Fixture {
        driver,
        providers_cleanups: cleanups,
        resources,
        tasks,
    }
}

fn plan_for(fixture: &Fixture, names: &[&str]) -> augur_extraction::ResourcePlan {
    let set: std::collections::BTreeSet<String> =
        names.iter().map(|s| s.to_string()).collect();
    resource_plan::level(&set, &fixture.resources, &fixture.tasks).unwrap()
}

#[test]
fn test_acquire_populates_context_in_levels() {
    let fx = fixture(|cl| {
        vec![
            StubProvider::new("r1", cl.clone()),
            StubProvider::new("r2", cl.clone()),
            StubProvider::new("r3", cl.clone()),
        ]
    });
    let plan = plan_for(&fx, &["r2", "r3", "r1"]);
    assert_eq!(plan.levels.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    let report = fx.driver.acquire(&mut ctx, &plan);

    assert!(report.is_complete());
    assert_eq!(report.acquired.len(), 3);
    for name in ["r1", "r2", "r3"] {
        assert!(ctx.has_resource(name));
    }
}

#[test]
fn test_failed_dependency_skips_downstream_task() {
    let fx = fixture(|cl| {
        vec![
            StubProvider::new("r1", cl.clone()).failing(10, false),
            StubProvider::new("r2", cl.clone()),
            StubProvider::new("r3", cl.clone()),
        ]
    });
    let plan = plan_for(&fx, &["r1", "r2", "r3"]);

    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    let report = fx.driver.acquire(&mut ctx, &plan);

    assert!(!report.is_complete());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].resource, "r1");
    assert_eq!(report.skipped_tasks, vec!["t3".to_string()]);
    assert!(ctx.has_resource("r2"));
    assert!(!ctx.has_resource("r1"));
    assert!(!ctx.has_resource("r3"));
}

#[test]
fn test_transient_failures_are_retried() {
    let fx = fixture(|cl| {
        vec![
            // Fails twice transiently; the 3-attempt policy succeeds on the
            // third try.
            StubProvider::new("r1", cl.clone()).failing(2, true),
        ]
    });
    let plan = plan_for(&fx, &["r1"]);

    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    let report = fx.driver.acquire(&mut ctx, &plan);

    assert!(report.is_complete());
    assert!(ctx.has_resource("r1"));
}

#[test]
fn test_permanent_failures_are_not_retried() {
    let fx = fixture(|cl| vec![StubProvider::new("r1", cl.clone()).failing(1, false)]);
    let plan = plan_for(&fx, &["r1"]);

    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    let report = fx.driver.acquire(&mut ctx, &plan);

    assert!(!report.is_complete());
    assert_eq!(report.failed.len(), 1);
}

#[test]
fn test_release_cleans_up_in_reverse_order() {
    let fx = fixture(|cl| {
        vec![
            StubProvider::new("r1", cl.clone()),
            StubProvider::new("r3", cl.clone()),
        ]
    });
    let plan = plan_for(&fx, &["r1", "r3"]);

    let dir = tempfile::tempdir().unwrap();
    let mut ctx = common::context(dir.path());
    fx.driver.acquire(&mut ctx, &plan);
    assert!(ctx.has_resource("r1") && ctx.has_resource("r3"));

    fx.driver.release(&mut ctx);

    let cleanups = fx.providers_cleanups.lock().unwrap();
    assert_eq!(*cleanups, vec!["r3".to_string(), "r1".to_string()]);
    drop(cleanups);
    assert!(!ctx.has_resource("r1"));
    assert!(!ctx.has_resource("r3"));
}

#[test]
fn test_retry_policy_backoff_is_bounded() {
    let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_millis(250));
    assert_eq!(policy.backoff(1), Duration::from_millis(100));
    assert_eq!(policy.backoff(2), Duration::from_millis(200));
    assert_eq!(policy.backoff(3), Duration::from_millis(250));
    assert_eq!(policy.backoff(10), Duration::from_millis(250));
}

#[test]
fn test_retry_policy_gives_up_after_max_attempts() {
    let policy = RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(1));
    let calls = AtomicU32::new(0);
    let result: Result<(), ResourceError> = policy.run("r", || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ResourceError::Transient {
            resource: "r".into(),
            message: "still down".into(),
        })
    });
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
