//! Error types for deltacon.
//!
//! Rendering itself never fails. Errors come from the outer surfaces: reading configuration and
//! writing to sinks.

use thiserror::Error;

/// Errors that can occur while setting up or driving a console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// IO error from reading configuration or writing to a sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration was parsed but describes an unusable console.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_error_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConsoleError = io_err.into();
        assert!(matches!(err, ConsoleError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_console_error_parse() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConsoleError = json_err.into();
        assert!(matches!(err, ConsoleError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_console_error_invalid_config() {
        let err = ConsoleError::InvalidConfig("tile_width must not be zero".into());
        assert_eq!(
            err.to_string(),
            "Invalid config: tile_width must not be zero"
        );
    }
}
