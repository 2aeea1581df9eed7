use thiserror::Error;

/// hoslog error types
#[derive(Error, Debug)]
pub enum HoslogError {
    /// Rejected input (bad category index, out-of-range time)
    #[error("validation error: {0}")]
    Validation(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Saved log could not be read or written
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Failed to parse user input or JSON
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for hoslog
pub type Result<T> = std::result::Result<T, HoslogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HoslogError::Validation("category index 7 out of range".into());
        assert_eq!(
            err.to_string(),
            "validation error: category index 7 out of range"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HoslogError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
