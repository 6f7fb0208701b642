//! Provider for exported scan reports (`scan_reports`).

use augur_core::errors::ResourceError;

use super::ResourceProvider;
use crate::context::ExecutionContext;
use crate::resources::handle::{ResourceHandle, ScanReports};
use crate::resources::spec::names;

/// Exports static-analysis reports for the build's commit through the
/// already-acquired `github_api` client.
#[derive(Default)]
pub struct ScanReportsProvider;

impl ScanReportsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceProvider for ScanReportsProvider {
    fn resource(&self) -> &str {
        names::SCAN_REPORTS
    }

    fn initialize(&self, ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError> {
        let client = ctx
            .resource(names::GITHUB_API)
            .and_then(ResourceHandle::as_github_api)
            .ok_or_else(|| ResourceError::Unavailable {
                resource: names::GITHUB_API.to_string(),
            })?;

        let reports = client.scan_reports(&ctx.repo, &ctx.build)?;
        tracing::debug!(build = %ctx.build.id, count = reports.len(), "scan reports exported");
        Ok(ResourceHandle::ScanReports(ScanReports { reports }))
    }
}
