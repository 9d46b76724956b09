use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkypaperError;

/// Opaque validator describing one version of a remote image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response metadata kept from the most recent successful download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchMeta {
    /// URL the bytes were finally served from (after redirects).
    pub source_url: String,
    pub content_disposition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Status(u16),
    Transport(String),
    Decode(String),
}

impl From<&SkypaperError> for FailureReason {
    fn from(err: &SkypaperError) -> Self {
        match err {
            SkypaperError::Status(code) => Self::Status(*code),
            SkypaperError::Json(e) => Self::Decode(e.to_string()),
            SkypaperError::Decode(msg) => Self::Decode(msg.clone()),
            other => Self::Transport(other.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
        }
    }
}

/// Per-provider memory of what was last seen and fetched.
///
/// Lives only in process memory: a restart forgets the signature and the
/// next cycle downloads again.
#[derive(Debug, Clone)]
pub struct ProviderState {
    endpoint: String,
    last_signature: Option<Signature>,
    last_fetch: Option<FetchMeta>,
    last_error: Option<FailureReason>,
}

impl ProviderState {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            last_signature: None,
            last_fetch: None,
            last_error: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn last_signature(&self) -> Option<&Signature> {
        self.last_signature.as_ref()
    }

    pub fn last_fetch(&self) -> Option<&FetchMeta> {
        self.last_fetch.as_ref()
    }

    pub fn last_error(&self) -> Option<&FailureReason> {
        self.last_error.as_ref()
    }

    /// Compare a freshly observed remote signature with the stored one.
    /// Stores it and returns `true` only when it differs (or none was stored).
    pub fn observe(&mut self, signature: Signature) -> bool {
        if self.last_signature.as_ref() == Some(&signature) {
            return false;
        }
        self.last_signature = Some(signature);
        true
    }

    pub fn record_fetch(&mut self, meta: FetchMeta) {
        self.last_fetch = Some(meta);
        self.last_error = None;
    }

    pub fn record_failure(&mut self, err: &SkypaperError) {
        self.last_error = Some(FailureReason::from(err));
    }

    pub fn clear_failure(&mut self) {
        self.last_error = None;
    }
}

/// Downloaded bytes paired with the name they will be saved under.
#[derive(Debug, Clone)]
pub struct WallpaperArtifact {
    pub bytes: bytes::Bytes,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    #[default]
    Swww,
    Hyprpaper,
    None,
}

impl BackendType {
    pub const ALL: &[BackendType] = &[BackendType::Swww, BackendType::Hyprpaper, BackendType::None];
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swww => write!(f, "swww"),
            Self::Hyprpaper => write!(f, "hyprpaper"),
            Self::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "swww" => Ok(Self::Swww),
            "hyprpaper" => Ok(Self::Hyprpaper),
            "none" => Ok(Self::None),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_first_signature_is_an_update() {
        let mut state = ProviderState::new("https://example.com/a.jpg");
        assert!(state.observe(Signature::new("Mon, 01 Jan 2024 00:00:00 GMT")));
        assert_eq!(
            state.last_signature().map(Signature::as_str),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );
    }

    #[test]
    fn test_observe_reports_each_change_once() {
        let mut state = ProviderState::new("https://example.com/a.jpg");
        assert!(state.observe(Signature::new("v1")));
        assert!(!state.observe(Signature::new("v1")));
        assert!(state.observe(Signature::new("v2")));
        assert!(!state.observe(Signature::new("v2")));
    }

    #[test]
    fn test_record_fetch_clears_failure() {
        let mut state = ProviderState::new("https://example.com/a.jpg");
        state.record_failure(&SkypaperError::Status(503));
        assert_eq!(state.last_error(), Some(&FailureReason::Status(503)));

        state.record_fetch(FetchMeta {
            source_url: "https://example.com/a.jpg".into(),
            content_disposition: None,
        });
        assert!(state.last_error().is_none());
        assert!(state.last_fetch().is_some());
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::Status(404).to_string(), "HTTP 404");
        let reason = FailureReason::from(&SkypaperError::Decode("missing images".into()));
        assert_eq!(reason, FailureReason::Decode("missing images".into()));
    }

    #[test]
    fn test_backend_type_parse() {
        assert_eq!("hyprpaper".parse::<BackendType>(), Ok(BackendType::Hyprpaper));
        assert_eq!("none".parse::<BackendType>(), Ok(BackendType::None));
        assert!("feh".parse::<BackendType>().is_err());
        for b in BackendType::ALL {
            assert_eq!(b.to_string().parse::<BackendType>(), Ok(*b));
        }
    }
}
