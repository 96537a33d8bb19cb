// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

/// Errors produced by the discovery, expansion and resolution stages
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request field is missing, malformed or inconsistent
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Reading a script or listing a script directory failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required process-wide setting is absent or unusable
    #[error("Configuration error for {var}: {message}")]
    Configuration { var: String, message: String },
}

impl Error {
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn configuration<V: Into<String>, M: Into<String>>(var: V, message: M) -> Self {
        Error::Configuration {
            var: var.into(),
            message: message.into(),
        }
    }

    /// Stable label an orchestrator can branch on
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation",
            Error::Io { .. } => "io",
            Error::Configuration { .. } => "configuration",
        }
    }
}

/// Result type for sqlplan operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_validation_message_names_field() {
        let err = Error::validation("start_date", "required when history is true");
        assert_eq!(err.kind(), "validation");
        assert_eq!(
            err.to_string(),
            "Invalid start_date: required when history is true"
        );
    }

    #[test]
    fn test_io_message_names_path() {
        let err = Error::io(
            "/scripts/missing.sql",
            std::io::Error::new(ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("/scripts/missing.sql"));
    }

    #[test]
    fn test_configuration_kind() {
        let err = Error::configuration("athena_raw_db", "not set");
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("athena_raw_db"));
    }
}
