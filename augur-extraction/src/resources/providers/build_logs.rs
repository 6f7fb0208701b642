//! Provider for staged build step logs (`build_logs`).

use std::path::PathBuf;

use augur_core::errors::ResourceError;

use super::ResourceProvider;
use crate::context::ExecutionContext;
use crate::resources::handle::{BuildLogs, LogFile, ResourceHandle};
use crate::resources::spec::names;

/// Reads every step log staged under `<log_root>/<build_id>/`.
///
/// The external log fetcher stages files there before extraction is
/// dispatched; from this provider's point of view the directory either
/// exists with complete content or the resource is unacquirable.
pub struct BuildLogsProvider {
    log_root: PathBuf,
}

impl BuildLogsProvider {
    pub fn new(log_root: PathBuf) -> Self {
        Self { log_root }
    }

    fn init_failed(message: String) -> ResourceError {
        ResourceError::InitializationFailed {
            resource: names::BUILD_LOGS.to_string(),
            message,
        }
    }
}

impl ResourceProvider for BuildLogsProvider {
    fn resource(&self) -> &str {
        names::BUILD_LOGS
    }

    fn initialize(&self, ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError> {
        let dir = self.log_root.join(ctx.build.id.to_string());
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| Self::init_failed(format!("read {}: {e}", dir.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::init_failed(format!("read dir entry: {e}")))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| Self::init_failed(format!("read {}: {e}", path.display())))?;
            files.push(LogFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                content,
            });
        }
        // Deterministic order regardless of directory iteration order.
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(build = %ctx.build.id, count = files.len(), "loaded build logs");
        Ok(ResourceHandle::BuildLogs(BuildLogs { files }))
    }
}
