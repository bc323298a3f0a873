//! Acquisition of the local mirror.
//!
//! One cycle per process: fetch the registry if the mirror folder is absent,
//! then run the readiness build exactly once. The fetch outcome does not
//! gate the build; a failed fetch shows up as a missing-file error there.

use std::path::Path;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use crate::data_loader::build_and_publish;
use crate::error::RegistryError;
use crate::fetcher::BulkFetcher;
use crate::locator::POLIS_FOLDER;
use crate::state::{AppState, Readiness};

/// Whether a mirror already exists below `local_path`
pub fn mirror_exists(local_path: &Path) -> bool {
    local_path.join(POLIS_FOLDER).is_dir()
}

/// Drives the single acquisition cycle
pub struct AcquisitionController<F> {
    state: Arc<AppState>,
    fetcher: F,
}

impl<F: BulkFetcher> AcquisitionController<F> {
    pub fn new(state: Arc<AppState>, fetcher: F) -> Self {
        Self { state, fetcher }
    }

    /// Start the cycle in the background. Consumes the controller, so a
    /// process gets exactly one cycle per controller it creates.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the cycle to completion
    pub async fn run(self) {
        let data = &self.state.config.data;

        if mirror_exists(&data.local_path) {
            info!(local_path = %data.local_path.display(), "Local mirror found");
        } else if data.remote_url.is_empty() {
            warn!(
                local_path = %data.local_path.display(),
                "Local mirror missing and no remote source configured"
            );
        } else {
            info!(
                remote = %data.remote_url,
                local_path = %data.local_path.display(),
                "Start async downloading"
            );
            match self.fetcher.fetch(&data.remote_url, &data.local_path).await {
                Ok(()) => info!("Bulk fetch finished"),
                Err(e) => warn!(error = %e, "Bulk fetch failed, building from what is on disk"),
            }
        }

        let state = Arc::clone(&self.state);
        let build = tokio::task::spawn_blocking(move || {
            build_and_publish(&state.readiness, &state.config.data)
        })
        .await;
        settle_build(&self.state.readiness, build);
    }
}

/// Publish a terminal state for a build task that never reported back
fn settle_build(readiness: &Readiness, build: std::result::Result<bool, JoinError>) {
    if let Err(e) = build {
        error!(error = %e, "Readiness build task failed");
        readiness.publish(Err(RegistryError::Unknown));
    }
}
