//! Error types shared across Layercut crates.

use std::path::PathBuf;

/// Top-level error type for Layercut operations.
#[derive(Debug, thiserror::Error)]
pub enum LayercutError {
    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using LayercutError.
pub type LayercutResult<T> = Result<T, LayercutError>;

impl LayercutError {
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LayercutError::export("surface lost").to_string(),
            "Export error: surface lost"
        );
        assert_eq!(
            LayercutError::config("/tmp/config.json", "expected value").to_string(),
            "Configuration error in /tmp/config.json: expected value"
        );
        assert_eq!(
            LayercutError::FileNotFound {
                path: PathBuf::from("/tmp/missing.json")
            }
            .to_string(),
            "File not found: /tmp/missing.json"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LayercutError = io.into();
        assert!(matches!(err, LayercutError::Io(_)));
    }
}
