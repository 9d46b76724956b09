use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::backend::WallpaperBackend;
use crate::error::{Result, SkypaperError};
use crate::models::{FailureReason, WallpaperArtifact};
use crate::sources::WallpaperProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New image saved at this path and handed to the backend.
    Applied(PathBuf),
    Unchanged,
    /// Check or download failed; nothing was written.
    Failed(FailureReason),
    /// The source answered with an empty body; nothing was written. Carries
    /// whatever failure the provider had recorded at the time.
    Empty(Option<FailureReason>),
}

/// Runs one check, download, save, apply cycle against a single provider.
pub struct WallpaperChanger {
    save_dir: PathBuf,
    provider: Box<dyn WallpaperProvider>,
    backend: Box<dyn WallpaperBackend>,
}

impl WallpaperChanger {
    pub fn new(
        save_dir: PathBuf,
        provider: Box<dyn WallpaperProvider>,
        backend: Box<dyn WallpaperBackend>,
    ) -> Self {
        Self {
            save_dir,
            provider,
            backend,
        }
    }

    pub fn provider(&self) -> &dyn WallpaperProvider {
        self.provider.as_ref()
    }

    /// Network and decode failures end the cycle as `Failed`; filesystem and
    /// backend failures are returned as errors.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let source = self.provider.name().to_string();
        info!(source = %source, "checking for a new wallpaper");

        match self.provider.check_for_update().await {
            Ok(true) => {}
            Ok(false) => {
                info!(source = %source, "no update");
                return Ok(CycleOutcome::Unchanged);
            }
            Err(e) => return Ok(self.failed(&e)),
        }

        let bytes = match self.provider.download().await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(self.failed(&e)),
        };
        if bytes.is_empty() {
            let reason = self.provider.state().last_error().cloned();
            match &reason {
                Some(r) => warn!(source = %source, reason = %r, "source returned an empty image, skipping"),
                None => warn!(source = %source, "source returned an empty image, skipping"),
            }
            return Ok(CycleOutcome::Empty(reason));
        }

        let artifact = WallpaperArtifact {
            bytes,
            filename: self.provider.derive_filename(),
        };
        let path = self.save(artifact).await?;

        info!(path = %path.display(), backend = self.backend.name(), "setting wallpaper");
        self.backend.set_wallpaper(&path).await?;
        Ok(CycleOutcome::Applied(path))
    }

    /// Write the artifact into the save directory. The directory must exist.
    async fn save(&self, artifact: WallpaperArtifact) -> Result<PathBuf> {
        let path = self.save_dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.bytes).await?;
        info!(path = %path.display(), size = artifact.bytes.len(), "saved wallpaper");
        Ok(path)
    }

    fn failed(&self, err: &SkypaperError) -> CycleOutcome {
        let reason = self
            .provider
            .state()
            .last_error()
            .cloned()
            .unwrap_or_else(|| FailureReason::from(err));
        error!(source = %self.provider.name(), reason = %reason, "wallpaper cycle failed");
        CycleOutcome::Failed(reason)
    }
}
