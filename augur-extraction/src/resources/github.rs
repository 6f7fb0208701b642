//! The GitHub API client seam.
//!
//! The engine consumes an authenticated client as a black box: given a
//! repository and a build, it returns structured data or raises a typed
//! transient/permanent error. Concrete HTTP clients live outside this crate;
//! tests ship in-memory fakes.

use augur_core::errors::ResourceError;
use augur_core::types::{BuildRef, RepoRef};
use serde::{Deserialize, Serialize};

/// Black-box GitHub client used by the `github_api` and `scan_reports`
/// providers.
pub trait GithubClient: Send + Sync {
    /// Verify credentials. Called once during acquisition; a transient
    /// failure here is a retry candidate for the acquisition layer.
    fn authenticate(&self) -> Result<(), ResourceError>;

    /// Discussion data for the pull request associated with a build.
    fn discussion(&self, repo: &RepoRef, build: &BuildRef) -> Result<DiscussionData, ResourceError>;

    /// Exported static-analysis / security scan reports for the build's
    /// commit.
    fn scan_reports(
        &self,
        repo: &RepoRef,
        build: &BuildRef,
    ) -> Result<Vec<ScanReport>, ResourceError>;
}

/// Pull-request discussion metrics for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscussionData {
    pub comment_count: u32,
    pub review_count: u32,
    pub approval_count: u32,
    pub changed_files: u32,
    /// Seconds between PR creation and the first review, when both exist.
    pub time_to_first_review_secs: Option<u64>,
}

/// One tool's scan result for a commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub tool: String,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub code_smells: u32,
}

impl ScanReport {
    /// Total findings across all severities, excluding code smells.
    pub fn vulnerability_total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }
}
