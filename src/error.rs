/*
 * Error type shared by every layer of the crate. Bad requests (missing or
 * mistyped arguments) are rejected at the method-call boundary before any
 * native call is made; native failures are wrapped so callers see a single
 * `PlatformError` regardless of which OS call failed.
 */
use crate::types::WindowId;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("'{method}' requires argument '{key}'")]
    MissingArgument { method: String, key: String },

    #[error("argument '{key}' of '{method}' must be {expected}")]
    InvalidArgument {
        method: String,
        key: String,
        expected: &'static str,
    },

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("no window registered for {0:?}")]
    WindowNotFound(WindowId),

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[cfg(target_os = "windows")]
    #[error("Win32 call failed: {0}")]
    Windows(#[from] windows::core::Error),
}

impl PlatformError {
    pub(crate) fn missing_argument(method: &str, key: &str) -> Self {
        PlatformError::MissingArgument {
            method: method.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid_argument(method: &str, key: &str, expected: &'static str) -> Self {
        PlatformError::InvalidArgument {
            method: method.to_string(),
            key: key.to_string(),
            expected,
        }
    }

    /// True for errors caused by the request itself rather than the platform.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            PlatformError::MissingArgument { .. }
                | PlatformError::InvalidArgument { .. }
                | PlatformError::UnknownMethod(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_argument_message_names_method_and_key() {
        let err = PlatformError::missing_argument("dock", "width");
        assert_eq!(err.to_string(), "'dock' requires argument 'width'");
        assert!(err.is_bad_request());
    }

    #[test]
    fn platform_failures_are_not_bad_requests() {
        let err = PlatformError::OperationFailed("SHAppBarMessage".into());
        assert!(!err.is_bad_request());
        assert!(!PlatformError::WindowNotFound(WindowId::new(3)).is_bad_request());
    }
}
