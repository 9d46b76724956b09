pub mod hyprpaper;
pub mod swww;

use async_trait::async_trait;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::models::BackendType;

/// Hook that turns an image already on local disk into the desktop background.
#[async_trait]
pub trait WallpaperBackend: Send + Sync {
    async fn set_wallpaper(&self, path: &Path) -> Result<()>;
    fn name(&self) -> &str;
}

pub fn create_backend(backend: BackendType, config: &Config) -> Box<dyn WallpaperBackend> {
    match backend {
        BackendType::Hyprpaper => Box::new(hyprpaper::HyprpaperBackend::new()),
        BackendType::Swww => Box::new(swww::SwwwBackend::new(config.transition.clone())),
        BackendType::None => Box::new(NoopBackend),
    }
}

/// Leaves the desktop alone; images are only saved.
pub struct NoopBackend;

#[async_trait]
impl WallpaperBackend for NoopBackend {
    async fn set_wallpaper(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "no wallpaper backend configured, skipping apply");
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}
