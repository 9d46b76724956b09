use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkypaperError};
use crate::models::BackendType;
use crate::paths::SkypaperPaths;

pub const DEFAULT_SOURCE: &str = "fengyun-4b";

/// Optional on-disk defaults; command-line flags override every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub transition: TransitionConfig,
}

impl Config {
    pub fn load(paths: &SkypaperPaths) -> Result<Self> {
        let path = paths.config_file();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SkypaperError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Missing file means defaults; a file that fails to parse is an error.
    pub fn load_or_default(paths: &SkypaperPaths) -> Result<Self> {
        if !paths.config_file().exists() {
            return Ok(Self::default());
        }
        Self::load(paths)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub save_path: PathBuf,
    pub source: String,
    /// Minutes between checks; zero or negative runs a single check.
    pub interval: i64,
    pub backend: BackendType,
    pub timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("./images"),
            source: DEFAULT_SOURCE.into(),
            interval: -1,
            backend: BackendType::default(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub r#type: String,
    pub duration: f64,
    pub fps: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            r#type: "fade".into(),
            duration: 2.0,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Once,
    Every(Duration),
}

impl Interval {
    pub fn from_minutes(minutes: i64) -> Self {
        match u64::try_from(minutes) {
            Ok(m) if m > 0 => Self::Every(Duration::from_secs(m.saturating_mul(60))),
            _ => Self::Once,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Once => write!(f, "once"),
            Self::Every(d) => write!(f, "every {}m", d.as_secs() / 60),
        }
    }
}

/// Finished run parameters, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangerConfig {
    pub save_dir: PathBuf,
    pub source: String,
    pub interval: Interval,
}
