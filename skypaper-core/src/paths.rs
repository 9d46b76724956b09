use std::path::{Path, PathBuf};

use crate::error::{Result, SkypaperError};

#[derive(Debug, Clone)]
pub struct SkypaperPaths {
    pub config_dir: PathBuf,
}

impl SkypaperPaths {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SkypaperError::Config("cannot resolve XDG config dir".into()))?
            .join("skypaper");

        Ok(Self { config_dir })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

/// Make a save path absolute, anchoring relative paths at `cwd`.
pub fn absolute_save_dir(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative = path.strip_prefix(".").unwrap_or(path);
    cwd.join(relative)
}
