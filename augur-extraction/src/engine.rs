//! Extraction engine — the public entry point wiring registry, resolver,
//! acquisition, and executor together for one run.

use std::path::PathBuf;
use std::sync::Arc;

use augur_core::config::AugurConfig;
use augur_core::errors::{ExtractionError, ResourceError};
use augur_core::events::{EventDispatcher, RunCompleteEvent, RunStartedEvent};
use augur_core::types::{BuildRef, RepoRef};

use crate::acquire::{AcquisitionDriver, LocalDispatcher, TaskDispatcher};
use crate::context::ExecutionContext;
use crate::executor::{Executor, FeatureVectorResult};
use crate::registry::{CatalogEntry, FeatureRegistry};
use crate::resolver::Resolver;
use crate::resources::handle::RepoSettings;
use crate::resources::providers::ProviderSet;
use crate::resources::{GithubClient, RepoLockTable, ResourceCatalog, TaskCatalog};
use crate::retry::RetryPolicy;

/// Identity and seed data for one extraction run.
pub struct RunInputs {
    pub repo: RepoRef,
    pub build: BuildRef,
    pub settings: RepoSettings,
}

/// Owns the long-lived pieces (registry, catalogs, providers, dispatcher)
/// and serves extraction requests. Runs for different (repo, build) pairs
/// may proceed in parallel; each owns its own context, and the registry is
/// read-only after construction.
pub struct ExtractionEngine {
    registry: FeatureRegistry,
    resources: ResourceCatalog,
    tasks: TaskCatalog,
    driver: AcquisitionDriver,
    executor: Executor,
    events: Arc<EventDispatcher>,
    config: AugurConfig,
    workdir_root: PathBuf,
}

impl ExtractionEngine {
    /// Assemble an engine from a validated registry and configuration.
    /// `client` enables the GitHub-backed providers; without it, features
    /// needing `github_api` or `scan_reports` degrade to their defaults.
    pub fn new(
        registry: FeatureRegistry,
        config: AugurConfig,
        client: Option<Arc<dyn GithubClient>>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        let registry =
            registry.with_disabled_groups(config.extraction.disabled_groups.iter().cloned());
        let resources = ResourceCatalog::builtin();
        let tasks = TaskCatalog::builtin();
        let locks = Arc::new(RepoLockTable::new());
        let providers = ProviderSet::builtin(&config.acquisition, client, locks);
        let retry = RetryPolicy::from_config(&config.acquisition);
        let dispatcher: Arc<dyn TaskDispatcher> =
            Arc::new(LocalDispatcher::new(config.acquisition.parallelism()));
        let driver = AcquisitionDriver::new(
            providers,
            tasks.clone(),
            retry,
            dispatcher,
            events.clone(),
        );
        let executor = Executor::new(resources.clone(), events.clone());
        let workdir_root = std::env::temp_dir().join("augur").join("runs");

        Self {
            registry,
            resources,
            tasks,
            driver,
            executor,
            events,
            config,
            workdir_root,
        }
    }

    /// Extract the requested features for one build.
    ///
    /// Resource acquisition failures degrade the run (affected features get
    /// their declared defaults) unless `extraction.strict` is set, in which
    /// case the first failure aborts before execution.
    pub fn extract(
        &self,
        inputs: RunInputs,
        requested: &[String],
    ) -> Result<FeatureVectorResult, ExtractionError> {
        let resolver = Resolver::new(&self.registry, &self.resources, &self.tasks);
        let plan = resolver.plan(requested)?;

        let workdir = self
            .workdir_root
            .join(format!("{}-{}", inputs.repo.id, inputs.build.id));
        std::fs::create_dir_all(&workdir).map_err(|e| ResourceError::InitializationFailed {
            resource: "workdir".to_string(),
            message: format!("create {}: {e}", workdir.display()),
        })?;

        self.events.emit_run_started(&RunStartedEvent {
            repo_slug: inputs.repo.slug.clone(),
            build_id: inputs.build.id.raw(),
            requested_features: requested.len(),
        });
        tracing::info!(
            repo = %inputs.repo.slug,
            build = %inputs.build.id,
            extractors = plan.extractors.len(),
            tasks = plan.resource_plan.task_count(),
            "starting extraction run"
        );

        let mut ctx =
            ExecutionContext::new(inputs.repo, inputs.build, inputs.settings, workdir.clone());

        let report = self.driver.acquire(&mut ctx, &plan.resource_plan);
        if self.config.extraction.strict() && !report.is_complete() {
            self.driver.release(&mut ctx);
            self.remove_workdir(&workdir);
            let message = report
                .first_failure()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| "acquisition incomplete".to_string());
            let resource = report
                .first_failure()
                .map(|f| f.resource.clone())
                .unwrap_or_default();
            return Err(ResourceError::InitializationFailed { resource, message }.into());
        }

        let outcome = self
            .executor
            .run(&mut ctx, &plan, &report, self.config.extraction.scope());
        self.driver.release(&mut ctx);
        self.remove_workdir(&workdir);
        let result = outcome?;

        self.events.emit_run_complete(&RunCompleteEvent {
            repo_slug: ctx.repo.slug.clone(),
            build_id: ctx.build.id.raw(),
            status: result.status.as_str().to_string(),
            feature_count: result.feature_count(),
            error_count: result.errors.len(),
            duration_ms: result.duration_ms,
        });

        Ok(result)
    }

    /// The exported feature catalog.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.registry.catalog()
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    fn remove_workdir(&self, workdir: &std::path::Path) {
        if let Err(e) = std::fs::remove_dir_all(workdir) {
            tracing::debug!(path = %workdir.display(), "workdir cleanup skipped: {e}");
        }
    }
}
