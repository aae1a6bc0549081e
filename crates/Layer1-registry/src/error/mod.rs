//! Error types for chime-registry
//!
//! 모든 에러를 중앙에서 관리합니다.
//!
//! All registry errors are caller programming errors, never runtime
//! conditions: unknown event names, absent listeners and zero-listener
//! emissions are valid no-ops, not errors.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// chime-registry error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::invalid_argument("count must be non-zero");
        assert_eq!(err.to_string(), "Invalid argument: count must be non-zero");
    }
}
