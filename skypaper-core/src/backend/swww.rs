use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::TransitionConfig;
use crate::error::{Result, SkypaperError};

use super::WallpaperBackend;

pub struct SwwwBackend {
    transition: TransitionConfig,
}

impl SwwwBackend {
    pub fn new(transition: TransitionConfig) -> Self {
        Self { transition }
    }

    fn build_command(&self, path: &Path) -> Command {
        let mut cmd = Command::new("swww");
        cmd.arg("img").arg(path);
        cmd.arg("--transition-type").arg(&self.transition.r#type);
        cmd.arg("--transition-duration")
            .arg(self.transition.duration.to_string());
        cmd.arg("--transition-fps")
            .arg(self.transition.fps.to_string());
        cmd
    }
}

#[async_trait]
impl WallpaperBackend for SwwwBackend {
    async fn set_wallpaper(&self, path: &Path) -> Result<()> {
        let output = self
            .build_command(path)
            .output()
            .await
            .map_err(|e| SkypaperError::Backend(format!("failed to run swww: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SkypaperError::Backend(format!("swww failed: {stderr}")));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "swww"
    }
}
