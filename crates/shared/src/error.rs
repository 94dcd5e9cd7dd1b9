use thiserror::Error;

/// Failures of the one-shot content dataset load.
///
/// None of these reach the visitor; the loader logs them and the site keeps
/// rendering empty collections.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content dataset {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to fetch content dataset from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("malformed content dataset: {0}")]
    Decode(String),
}

impl ContentError {
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
