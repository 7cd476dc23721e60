//! Error types for sftpkit

use std::fmt;

/// Unified error type for all sftpkit operations
#[derive(Debug)]
pub enum SftpkitError {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error (unknown shell type, unknown encoding name, ...)
    Config(String),

    /// No safe shell rendering exists for this path
    UnsupportedPath(String),

    /// Operation is not available for the configured remote shell
    NotSupported(String),

    /// Remote command failed on the exec channel
    Command(String),

    /// Other error
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for SftpkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SftpkitError::Io(e) => write!(f, "IO error: {}", e),
            SftpkitError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SftpkitError::UnsupportedPath(path) => {
                write!(f, "Path is not supported by the remote shell: {:?}", path)
            }
            SftpkitError::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            SftpkitError::Command(msg) => write!(f, "Remote command failed: {}", msg),
            SftpkitError::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for SftpkitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SftpkitError::Io(e) => Some(e),
            SftpkitError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SftpkitError {
    fn from(err: std::io::Error) -> Self {
        SftpkitError::Io(err)
    }
}

/// Result type for sftpkit operations
pub type SftpkitResult<T> = Result<T, SftpkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SftpkitError::Config("unknown shell type \"bash\"".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown shell type \"bash\""
        );

        let err = SftpkitError::UnsupportedPath("c:/a\"b".to_string());
        assert_eq!(
            err.to_string(),
            "Path is not supported by the remote shell: \"c:/a\\\"b\""
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "channel closed");
        let err: SftpkitError = io_err.into();
        assert!(matches!(err, SftpkitError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_source_is_none_for_message_variants() {
        let err = SftpkitError::NotSupported("hashes over cmd".to_string());
        assert!(std::error::Error::source(&err).is_none());
    }
}
