//! Provider for the authenticated GitHub client (`github_api`).

use std::sync::Arc;

use augur_core::errors::ResourceError;

use super::ResourceProvider;
use crate::context::ExecutionContext;
use crate::resources::github::GithubClient;
use crate::resources::handle::ResourceHandle;
use crate::resources::spec::names;

/// Verifies the injected client's credentials and hands it to the context.
pub struct GithubApiProvider {
    client: Arc<dyn GithubClient>,
}

impl GithubApiProvider {
    pub fn new(client: Arc<dyn GithubClient>) -> Self {
        Self { client }
    }
}

impl ResourceProvider for GithubApiProvider {
    fn resource(&self) -> &str {
        names::GITHUB_API
    }

    fn initialize(&self, ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError> {
        self.client.authenticate()?;
        tracing::debug!(repo = %ctx.repo.slug, "github client authenticated");
        Ok(ResourceHandle::GithubApi(self.client.clone()))
    }
}
