//! Error types for ELEC-MATE
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in the voice tool setup library
#[derive(Debug, Error)]
pub enum ElecMateError {
    /// Tool not present in the registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid state transition or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Input rejected before any write or network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Settings persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Registry could not be loaded or violates an invariant
    #[error("Registry error: {0}")]
    Registry(String),

    /// Payments connect service error
    #[error("Connect error: {0}")]
    Connect(String),

    /// Clipboard write failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for ELEC-MATE operations
pub type Result<T> = std::result::Result<T, ElecMateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_error() {
        let err = ElecMateError::ToolNotFound("navigate_to".to_string());
        assert_eq!(err.to_string(), "Tool not found: navigate_to");
    }

    #[test]
    fn test_validation_error() {
        let err = ElecMateError::Validation("logo exceeds 2 MiB".to_string());
        assert_eq!(err.to_string(), "Validation failed: logo exceeds 2 MiB");
    }

    #[test]
    fn test_storage_error() {
        let err = ElecMateError::Storage("file locked".to_string());
        assert_eq!(err.to_string(), "Storage error: file locked");
    }

    #[test]
    fn test_connect_error() {
        let err = ElecMateError::Connect("HTTP 502".to_string());
        assert_eq!(err.to_string(), "Connect error: HTTP 502");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ElecMateError = io_err.into();
        assert!(matches!(err, ElecMateError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: ElecMateError = json_err.into();
        assert!(matches!(err, ElecMateError::Json(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ not: a list").unwrap_err();
        let err: ElecMateError = yaml_err.into();
        assert!(matches!(err, ElecMateError::Yaml(_)));
    }
}
