//! Bulk transfer of the remote registry to the local mirror.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Copies a remote JSON tree into a local folder
pub trait BulkFetcher: Send + Sync + 'static {
    fn fetch(&self, remote: &str, local: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Recursive mirror through the system `wget`, keeping only `.json` files
#[derive(Debug, Clone)]
pub struct WgetFetcher {
    program: PathBuf,
}

impl WgetFetcher {
    pub fn new() -> Self {
        Self::with_program("wget")
    }

    /// Use a specific executable instead of `wget` from `PATH`
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, remote: &str, local: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-r", "-q", "-np", "-nH", "-A", "json", "-P"])
            .arg(local)
            .arg(remote)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl Default for WgetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkFetcher for WgetFetcher {
    async fn fetch(&self, remote: &str, local: &Path) -> Result<()> {
        debug!(program = %self.program.display(), remote, "Running bulk fetch");
        let output = self.command(remote, local).output().await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RegistryError::Server {
                message: format!(
                    "Bulk fetch exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}
