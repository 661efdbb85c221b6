//! Error types for favtube

use thiserror::Error;

/// Coarse classification of failures, used by the CLI for exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network errors
    NetworkError,
    UpstreamStatus,
    YouTubeParseError,

    // User errors
    InvalidInput,
    InvalidConfig,
    NotFound,

    // System errors
    FileError,
}

impl ErrorCode {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::InvalidInput | Self::NotFound => 2,
            Self::InvalidConfig => 3,
            Self::NetworkError | Self::UpstreamStatus | Self::YouTubeParseError => 4,
            Self::FileError => 5,
        }
    }
}

/// Main error type for favtube
#[derive(Error, Debug)]
pub enum FavtubeError {
    #[error("YouTube API returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Failed to parse YouTube response: {0}")]
    YouTubeParse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No API key configured. Set YOUTUBE_API_KEY or add api_key to the config file.")]
    MissingApiKey,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FavtubeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Status { .. } => ErrorCode::UpstreamStatus,
            Self::YouTubeParse(_) => ErrorCode::YouTubeParseError,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::InvalidConfig(_) | Self::MissingApiKey => ErrorCode::InvalidConfig,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::File(_) => ErrorCode::FileError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Json(_) => ErrorCode::YouTubeParseError,
        }
    }

    /// HTTP status carried by an upstream failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FavtubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code() {
        let err = FavtubeError::Status {
            status: 403,
            endpoint: "search".into(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.code(), ErrorCode::UpstreamStatus);
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        assert_eq!(FavtubeError::MissingApiKey.code(), ErrorCode::InvalidConfig);
        assert_eq!(FavtubeError::MissingApiKey.status(), None);
    }
}
