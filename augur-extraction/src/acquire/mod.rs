//! Acquisition driver — runs the resource-level plan against providers.
//!
//! Tasks within one level are independent by construction and run
//! concurrently through a `TaskDispatcher`; levels run strictly in order.
//! A failed task marks its resources (and every task depending on it)
//! unavailable, and the run continues in degraded mode unless the caller
//! opted into strict behavior.

use std::sync::Arc;
use std::time::Instant;

use augur_core::errors::{AugurErrorCode, ResourceError};
use augur_core::events::{EventDispatcher, ResourceAcquiredEvent, ResourceFailedEvent};
use augur_core::types::collections::{BTreeSet, FxHashSet};
use rayon::prelude::*;

use crate::context::ExecutionContext;
use crate::resources::handle::ResourceHandle;
use crate::resources::providers::ProviderSet;
use crate::resources::TaskCatalog;
use crate::resolver::ResourcePlan;
use crate::retry::RetryPolicy;

/// Outcome of one acquisition task.
pub struct TaskOutcome {
    pub task: String,
    pub result: Result<Vec<(String, ResourceHandle)>, ResourceError>,
    pub duration_ms: u64,
}

/// Seam to the external task-execution system.
///
/// The engine hands each plan level to the dispatcher as named task
/// identifiers; tasks are expected to be idempotent and independently
/// retryable. The in-process `LocalDispatcher` is the shipped
/// implementation for tests and single-node deployments.
pub trait TaskDispatcher: Send + Sync {
    /// Run one level of independent tasks, returning every task's outcome.
    fn run_level(
        &self,
        level: &[String],
        runner: &(dyn Fn(&str) -> TaskOutcome + Sync),
    ) -> Vec<TaskOutcome>;
}

/// Runs level tasks on a rayon pool sized by the acquisition config.
pub struct LocalDispatcher {
    pool: Option<rayon::ThreadPool>,
}

impl LocalDispatcher {
    pub fn new(parallelism: usize) -> Self {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .build()
        {
            Ok(pool) => Self { pool: Some(pool) },
            Err(e) => {
                tracing::warn!("falling back to global rayon pool: {e}");
                Self { pool: None }
            }
        }
    }
}

impl TaskDispatcher for LocalDispatcher {
    fn run_level(
        &self,
        level: &[String],
        runner: &(dyn Fn(&str) -> TaskOutcome + Sync),
    ) -> Vec<TaskOutcome> {
        let work = || {
            level
                .par_iter()
                .map(|task| runner(task.as_str()))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}

/// A failed acquisition task and the resource it was acquiring.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub task: String,
    pub resource: String,
    pub message: String,
}

/// What the driver managed to acquire.
#[derive(Debug, Clone, Default)]
pub struct AcquisitionReport {
    /// Resource names acquired, in completion order.
    pub acquired: Vec<String>,
    pub failed: Vec<TaskFailure>,
    /// Tasks never attempted because a dependency failed.
    pub skipped_tasks: Vec<String>,
}

impl AcquisitionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped_tasks.is_empty()
    }

    pub fn first_failure(&self) -> Option<&TaskFailure> {
        self.failed.first()
    }
}

/// Drives providers according to the resource-level plan.
pub struct AcquisitionDriver {
    providers: ProviderSet,
    tasks: TaskCatalog,
    retry: RetryPolicy,
    dispatcher: Arc<dyn TaskDispatcher>,
    events: Arc<EventDispatcher>,
}

impl AcquisitionDriver {
    pub fn new(
        providers: ProviderSet,
        tasks: TaskCatalog,
        retry: RetryPolicy,
        dispatcher: Arc<dyn TaskDispatcher>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            providers,
            tasks,
            retry,
            dispatcher,
            events,
        }
    }

    /// Acquire the plan's resources into the context, level by level.
    pub fn acquire(&self, ctx: &mut ExecutionContext, plan: &ResourcePlan) -> AcquisitionReport {
        let mut report = AcquisitionReport::default();
        let mut unusable: FxHashSet<String> = FxHashSet::default();

        for level in &plan.levels {
            let mut runnable: Vec<String> = Vec::new();
            for task in level {
                let deps_ok = self
                    .tasks
                    .get(task)
                    .map(|spec| spec.depends_on.iter().all(|d| !unusable.contains(d)))
                    .unwrap_or(false);
                if deps_ok {
                    runnable.push(task.clone());
                } else {
                    tracing::debug!(task = %task, "skipping task, dependency failed");
                    unusable.insert(task.clone());
                    report.skipped_tasks.push(task.clone());
                }
            }

            let outcomes = {
                let ctx_ref: &ExecutionContext = ctx;
                self.dispatcher.run_level(&runnable, &|task| {
                    self.run_task(ctx_ref, task, &plan.resources)
                })
            };

            for outcome in outcomes {
                match outcome.result {
                    Ok(handles) => {
                        for (resource, handle) in handles {
                            self.events.emit_resource_acquired(&ResourceAcquiredEvent {
                                resource: resource.clone(),
                                task: outcome.task.clone(),
                                duration_ms: outcome.duration_ms,
                            });
                            report.acquired.push(resource.clone());
                            ctx.set_resource(resource, handle);
                        }
                    }
                    Err(e) => {
                        let resource = e.resource().unwrap_or("<unknown>").to_string();
                        tracing::error!(
                            task = %outcome.task,
                            resource = %resource,
                            "acquisition failed: {e}"
                        );
                        self.events.emit_resource_failed(&ResourceFailedEvent {
                            resource: resource.clone(),
                            task: outcome.task.clone(),
                            message: e.to_string(),
                        });
                        unusable.insert(outcome.task.clone());
                        report.failed.push(TaskFailure {
                            task: outcome.task,
                            resource,
                            message: e.log_string(),
                        });
                    }
                }
            }
        }

        report
    }

    /// Run a single task: initialize every requested resource it produces,
    /// under the retry policy.
    fn run_task(
        &self,
        ctx: &ExecutionContext,
        task: &str,
        requested: &BTreeSet<String>,
    ) -> TaskOutcome {
        let started = Instant::now();
        let result = self.run_task_inner(ctx, task, requested);
        TaskOutcome {
            task: task.to_string(),
            result,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn run_task_inner(
        &self,
        ctx: &ExecutionContext,
        task: &str,
        requested: &BTreeSet<String>,
    ) -> Result<Vec<(String, ResourceHandle)>, ResourceError> {
        let spec = self
            .tasks
            .get(task)
            .ok_or_else(|| ResourceError::Unavailable {
                resource: task.to_string(),
            })?;

        let mut handles = Vec::new();
        for resource in spec.produces.iter().filter(|r| requested.contains(*r)) {
            let provider =
                self.providers
                    .for_resource(resource)
                    .ok_or_else(|| ResourceError::Unavailable {
                        resource: resource.clone(),
                    })?;
            let handle = self
                .retry
                .run(resource, || provider.initialize(ctx))?;
            handles.push((resource.clone(), handle));
        }
        Ok(handles)
    }

    /// Release acquired resources in reverse acquisition order.
    ///
    /// Cleanup never raises: a provider that fails to clean up is logged and
    /// the remaining resources still get their chance.
    pub fn release(&self, ctx: &mut ExecutionContext) {
        let order: Vec<String> = ctx.acquired_order().iter().rev().cloned().collect();
        for resource in order {
            if let Some(provider) = self.providers.for_resource(&resource) {
                provider.cleanup(ctx);
            }
        }
        ctx.clear_resources();
    }
}
