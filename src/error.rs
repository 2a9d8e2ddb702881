use thiserror::Error;

/// Failure of a single request issued by the bridge.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{status} - {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid JSON response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message of an HTTP failure, `None` for every other failure or when the
    /// backend gave nothing usable.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}
