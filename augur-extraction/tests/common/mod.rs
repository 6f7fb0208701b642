//! Shared fixtures for the extraction integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use augur_core::errors::{ExtractError, ResourceError};
use augur_core::types::collections::FxHashMap;
use augur_core::types::{BuildId, BuildRef, FeatureValue, RepoId, RepoRef};
use augur_extraction::context::ExecutionContext;
use augur_extraction::extractors::FeatureExtractor;
use augur_extraction::resources::handle::{RepoSettings, ResourceHandle};
use augur_extraction::resources::{DiscussionData, GithubClient, ScanReport};

/// Configurable in-memory extractor for framework tests.
pub struct StubExtractor {
    pub id: String,
    pub group: String,
    pub provides: Vec<(String, FeatureValue)>,
    pub requires_resources: Vec<String>,
    pub requires_features: Vec<String>,
    pub priority: i32,
    pub run_degraded: bool,
    pub fail_with: Option<String>,
    pub calls: AtomicU32,
}

impl StubExtractor {
    pub fn new(id: &str, provides: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            group: id.to_string(),
            provides: provides
                .iter()
                .map(|name| (name.to_string(), FeatureValue::Int(1)))
                .collect(),
            requires_resources: Vec::new(),
            requires_features: Vec::new(),
            priority: 0,
            run_degraded: true,
            fail_with: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_resources(mut self, resources: &[&str]) -> Self {
        self.requires_resources = resources.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.requires_features = features.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn no_degraded(mut self) -> Self {
        self.run_degraded = false;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeatureExtractor for StubExtractor {
    fn id(&self) -> &str {
        &self.id
    }

    fn group(&self) -> &str {
        &self.group
    }

    fn provides(&self) -> Vec<String> {
        self.provides.iter().map(|(n, _)| n.clone()).collect()
    }

    fn requires_resources(&self) -> Vec<String> {
        self.requires_resources.clone()
    }

    fn requires_features(&self) -> Vec<String> {
        self.requires_features.clone()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run_degraded(&self) -> bool {
        self.run_degraded
    }

    fn extract(
        &self,
        _ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(ExtractError::Failed {
                extractor: self.id.clone(),
                message: message.clone(),
            });
        }
        Ok(self
            .provides
            .iter()
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect())
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        self.provides
            .iter()
            .map(|(n, _)| (n.clone(), FeatureValue::Int(0)))
            .collect()
    }
}

/// GitHub client fake returning fixed data.
pub struct FakeGithubClient {
    pub discussion: DiscussionData,
    pub reports: Vec<ScanReport>,
    pub auth_fails: bool,
}

impl Default for FakeGithubClient {
    fn default() -> Self {
        Self {
            discussion: DiscussionData {
                comment_count: 4,
                review_count: 2,
                approval_count: 1,
                changed_files: 3,
                time_to_first_review_secs: Some(3600),
            },
            reports: vec![ScanReport {
                tool: "trivy".into(),
                critical: 1,
                high: 2,
                medium: 3,
                low: 4,
                code_smells: 0,
            }],
            auth_fails: false,
        }
    }
}

impl GithubClient for FakeGithubClient {
    fn authenticate(&self) -> Result<(), ResourceError> {
        if self.auth_fails {
            return Err(ResourceError::InitializationFailed {
                resource: "github_api".into(),
                message: "bad credentials".into(),
            });
        }
        Ok(())
    }

    fn discussion(
        &self,
        _repo: &RepoRef,
        _build: &BuildRef,
    ) -> Result<DiscussionData, ResourceError> {
        Ok(self.discussion.clone())
    }

    fn scan_reports(
        &self,
        _repo: &RepoRef,
        _build: &BuildRef,
    ) -> Result<Vec<ScanReport>, ResourceError> {
        Ok(self.reports.clone())
    }
}

pub fn repo_ref(slug: &str, clone_url: &str) -> RepoRef {
    RepoRef {
        id: RepoId(11),
        slug: slug.to_string(),
        clone_url: clone_url.to_string(),
        default_branch: "main".to_string(),
    }
}

pub fn build_ref(id: i64, head_sha: &str) -> BuildRef {
    BuildRef {
        id: BuildId(id),
        run_number: 1,
        head_sha: head_sha.to_string(),
        branch: "main".to_string(),
        actor: Some("dev".to_string()),
    }
}

pub fn context(workdir: &Path) -> ExecutionContext {
    ExecutionContext::new(
        repo_ref("octo/widgets", "https://example.invalid/repo.git"),
        build_ref(100, "0000000000000000000000000000000000000000"),
        RepoSettings::default(),
        workdir.to_path_buf(),
    )
}

/// Seed a context with an arbitrary non-core handle for executor tests.
pub fn seed_scan_reports(ctx: &mut ExecutionContext, name: &str) {
    ctx.set_resource(
        name,
        ResourceHandle::ScanReports(augur_extraction::resources::handle::ScanReports {
            reports: Vec::new(),
        }),
    );
}

/// Create a git repository with `count` commits; returns the head shas in
/// commit order (oldest first).
pub fn init_git_repo(path: &Path, count: usize) -> Vec<String> {
    let repo = git2::Repository::init(path).unwrap();
    let sig = git2::Signature::now("dev", "dev@example.invalid").unwrap();
    let mut shas = Vec::new();
    let mut parent: Option<git2::Oid> = None;

    for i in 0..count {
        std::fs::write(path.join(format!("file{i}.txt")), format!("content {i}\n")).unwrap();
        std::fs::write(path.join("shared.txt"), format!("revision {i}\n")).unwrap();

        let mut index = repo.index().unwrap();
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let parents: Vec<git2::Commit> = parent
            .into_iter()
            .map(|oid| repo.find_commit(oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        let oid = repo
            .commit(
                Some("HEAD"),
                &sig,
                &sig,
                &format!("commit {i}: update shared and add file{i}"),
                &tree,
                &parent_refs,
            )
            .unwrap();
        shas.push(oid.to_string());
        parent = Some(oid);
    }
    shas
}
