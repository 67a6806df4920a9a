//! Custom error types for tv-browser.
//!
//! Catalog failures are all [`NetworkError`]s; the remaining variants cover the
//! config file and the terminal.

use std::error::Error;
use std::fmt;
use std::io;

/// A failed catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The server answered with a non-success status
    Status { url: String, status: u16 },
    /// The request never produced a response (DNS, refused, timeout, ...)
    Transport(String),
    /// The response body could not be decoded
    Decode(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Status { url, status } => {
                write!(f, "{} returned HTTP {}", url, status)
            }
            NetworkError::Transport(msg) => write!(f, "request failed: {}", msg),
            NetworkError::Decode(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

/// Application error types.
#[derive(Debug)]
pub enum AppError {
    /// Catalog request errors
    Network(NetworkError),
    /// Configuration errors
    Config(String),
    /// File and terminal I/O errors
    Io(io::Error),
}

impl AppError {
    /// Whether this error came from talking to the catalog.
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(err) => write!(f, "Network error: {}", err),
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NetworkError> for AppError {
    fn from(err: NetworkError) -> Self {
        AppError::Network(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Network(NetworkError::Decode(err.to_string()))
        } else {
            AppError::Network(NetworkError::Transport(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Network(NetworkError::Decode(err.to_string()))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err: AppError = NetworkError::Status {
            url: "https://api.tvmaze.com/shows/1/episodes".to_string(),
            status: 404,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Network error: https://api.tvmaze.com/shows/1/episodes returned HTTP 404"
        );
        assert!(err.is_network());
    }

    #[test]
    fn test_transport_and_decode_are_distinct() {
        let transport = NetworkError::Transport("connection refused".to_string());
        let decode = NetworkError::Decode("expected value".to_string());
        assert_ne!(transport, decode);
        assert!(transport.to_string().contains("connection refused"));
        assert!(decode.to_string().starts_with("malformed response"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(!app_err.is_network());
    }

    #[test]
    fn test_error_from_json_is_decode() {
        let json_err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(
            app_err,
            AppError::Network(NetworkError::Decode(_))
        ));
    }
}
