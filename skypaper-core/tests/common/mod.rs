#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use skypaper_core::backend::WallpaperBackend;
use skypaper_core::error::{Result, SkypaperError};
use skypaper_core::models::{ProviderState, Signature};
use skypaper_core::sources::WallpaperProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Check,
    Download,
    Apply(PathBuf),
}

/// Shared, timestamped record of what the fakes were asked to do.
#[derive(Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(Event, Instant)>>>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventLog {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let log = Self {
            events: Arc::new(Mutex::new(Vec::new())),
            tx,
        };
        (log, rx)
    }

    pub fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap()
            .push((event.clone(), Instant::now()));
        let _ = self.tx.send(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn timed(&self) -> Vec<(Event, Instant)> {
        self.events.lock().unwrap().clone()
    }
}

/// Provider that answers from canned results. Once a queue runs dry, checks
/// report an update and downloads return `[0x00, 0x01]`.
pub struct ScriptedProvider {
    log: EventLog,
    state: ProviderState,
    checks: VecDeque<std::result::Result<bool, u16>>,
    downloads: VecDeque<std::result::Result<Vec<u8>, u16>>,
    filename: String,
}

impl ScriptedProvider {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            state: ProviderState::new("https://example.com/test.jpg"),
            checks: VecDeque::new(),
            downloads: VecDeque::new(),
            filename: "20240101-000000_test.jpg".into(),
        }
    }

    pub fn with_checks(mut self, checks: Vec<std::result::Result<bool, u16>>) -> Self {
        self.checks = checks.into();
        self
    }

    pub fn with_downloads(mut self, downloads: Vec<std::result::Result<Vec<u8>, u16>>) -> Self {
        self.downloads = downloads.into();
        self
    }
}

#[async_trait]
impl WallpaperProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn state(&self) -> &ProviderState {
        &self.state
    }

    async fn check_for_update(&mut self) -> Result<bool> {
        self.log.push(Event::Check);
        match self.checks.pop_front().unwrap_or(Ok(true)) {
            Ok(updated) => {
                if updated {
                    let n = self.log.events().len();
                    self.state.observe(Signature::new(format!("v{n}")));
                }
                Ok(updated)
            }
            Err(code) => {
                let err = SkypaperError::Status(code);
                self.state.record_failure(&err);
                Err(err)
            }
        }
    }

    async fn download(&mut self) -> Result<bytes::Bytes> {
        self.log.push(Event::Download);
        match self.downloads.pop_front().unwrap_or(Ok(vec![0x00, 0x01])) {
            Ok(data) => Ok(bytes::Bytes::from(data)),
            Err(code) => {
                let err = SkypaperError::Status(code);
                self.state.record_failure(&err);
                Err(err)
            }
        }
    }

    fn derive_filename(&self) -> String {
        self.filename.clone()
    }
}

/// Backend that records each apply call, optionally failing the first ones.
pub struct RecordingBackend {
    log: EventLog,
    failures: Mutex<u32>,
}

impl RecordingBackend {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            failures: Mutex::new(0),
        }
    }

    pub fn failing_first(log: EventLog, failures: u32) -> Self {
        Self {
            log,
            failures: Mutex::new(failures),
        }
    }
}

#[async_trait]
impl WallpaperBackend for RecordingBackend {
    async fn set_wallpaper(&self, path: &Path) -> Result<()> {
        self.log.push(Event::Apply(path.to_path_buf()));
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(SkypaperError::Backend("display unavailable".into()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|entries| entries.flatten().map(|e| e.path()).collect())
        .unwrap_or_default();
    files.sort();
    files
}
