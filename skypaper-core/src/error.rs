#[derive(Debug, thiserror::Error)]
pub enum SkypaperError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status: {0}")]
    Status(u16),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl SkypaperError {
    /// Transport failures and non-200 responses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status(_))
    }

    /// Failures parsing structured content returned by a source.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, SkypaperError>;
