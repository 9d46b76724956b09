use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, SkypaperError};

use super::WallpaperBackend;

/// Drives a running hyprpaper through `hyprctl`, covering every monitor.
pub struct HyprpaperBackend;

impl HyprpaperBackend {
    pub fn new() -> Self {
        Self
    }

    fn commands(path: &Path) -> [Vec<String>; 3] {
        let path_str = path.to_string_lossy();
        [
            vec!["hyprpaper".into(), "preload".into(), path_str.to_string()],
            // empty monitor name targets all outputs
            vec!["hyprpaper".into(), "wallpaper".into(), format!(",{path_str}")],
            // drop the previous image from memory
            vec!["hyprpaper".into(), "unload".into(), "unused".into()],
        ]
    }

    async fn hyprctl(args: &[String]) -> Result<()> {
        let output = Command::new("hyprctl")
            .args(args)
            .output()
            .await
            .map_err(|e| SkypaperError::Backend(format!("failed to run hyprctl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SkypaperError::Backend(format!("hyprctl failed: {stderr}")));
        }
        Ok(())
    }
}

impl Default for HyprpaperBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WallpaperBackend for HyprpaperBackend {
    async fn set_wallpaper(&self, path: &Path) -> Result<()> {
        for args in Self::commands(path) {
            Self::hyprctl(&args).await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "hyprpaper"
    }
}
