// Error handling utilities to keep CLI error messages uniform

use anyhow::{Result, anyhow};

/// Extension trait for Results to provide standardized error mapping
pub trait ErrorContext<T> {
    /// Map error with a context message for common "Failed to..." patterns
    fn with_context_msg(self, msg: &str) -> Result<T>;

    /// Common error mapping for file operations
    fn file_context(self, operation: &str, path: &str) -> Result<T>;

    /// Common error mapping for event (request) decoding
    fn event_context(self, stage: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context_msg(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow!("{}: {}", msg, e))
    }

    fn file_context(self, operation: &str, path: &str) -> Result<T> {
        self.with_context_msg(&format!("Failed to {} {}", operation, path))
    }

    fn event_context(self, stage: &str) -> Result<T> {
        self.with_context_msg(&format!("Failed to decode {} event", stage))
    }
}
