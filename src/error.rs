//! Error types for the cfgtree library
//!
//! Read-path misses (an address that resolves to nothing) are not errors; they
//! travel as [`Miss`](crate::core::Miss) values. The variants here cover the
//! hard failures: loading, typed coercion, invalid mutation and bad input.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum CfgTreeError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The source text does not describe a group tree
    #[error("Invalid source {source_name}: {reason}")]
    InvalidSource { source_name: String, reason: String },

    /// Address path cannot be used for the requested operation
    #[error("Invalid path: {path} ({reason})")]
    InvalidPath { path: String, reason: String },

    /// Nothing lives at the given address
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Positional access beyond the end of a collection. `path` is empty for
    /// access by position rather than by address.
    #[error("Index out of range: {index} (length {len}){}", at_path(.path))]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// Attempt to overwrite a whole group with a scalar
    #[error("Invalid mutation at {path}: {reason}")]
    InvalidMutation { path: String, reason: String },

    /// Filter expression does not follow `[key:value,...]`
    #[error("Malformed filter: {expr} ({reason})")]
    MalformedFilter { expr: String, reason: String },

    /// Value type conversion errors
    #[error("Type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: String, to: String },

    /// File discovery errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CfgTreeError>;

impl CfgTreeError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new invalid source error
    pub fn invalid_source(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new index out of range error
    pub fn index_out_of_range(path: impl Into<String>, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            path: path.into(),
            index,
            len,
        }
    }

    /// Create a new invalid mutation error
    pub fn invalid_mutation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMutation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new malformed filter error
    pub fn malformed_filter(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedFilter {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    /// Create a new type conversion error
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for the two read-path misses (`NotFound`, `IndexOutOfRange`)
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::IndexOutOfRange { .. })
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FileNotFound { .. } | Self::Io(_) => ErrorSeverity::Critical,
            Self::InvalidSource { .. } | Self::Yaml(_) | Self::Regex(_) => ErrorSeverity::High,
            Self::InvalidMutation { .. }
            | Self::InvalidPath { .. }
            | Self::TypeConversion { .. } => ErrorSeverity::Medium,
            Self::NotFound { .. }
            | Self::IndexOutOfRange { .. }
            | Self::MalformedFilter { .. }
            | Self::PathResolution { .. }
            | Self::Validation { .. } => ErrorSeverity::Low,
        }
    }
}

fn at_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CfgTreeError::file_not_found("app.yaml");
        assert!(matches!(err, CfgTreeError::FileNotFound { .. }));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(
            CfgTreeError::type_conversion("x", "integer").severity(),
            ErrorSeverity::Medium
        );
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::High);
        assert!(ErrorSeverity::High > ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium > ErrorSeverity::Low);
    }

    #[test]
    fn test_misses() {
        assert!(CfgTreeError::not_found("a.b").is_miss());
        assert!(CfgTreeError::index_out_of_range("a.b[3]", 3, 2).is_miss());
        assert!(!CfgTreeError::invalid_mutation("a", "group").is_miss());
    }

    #[test]
    fn test_error_messages() {
        let err = CfgTreeError::index_out_of_range("hosts[4]", 4, 2);
        assert_eq!(
            err.to_string(),
            "Index out of range: 4 (length 2) at hosts[4]"
        );
        assert_eq!(
            CfgTreeError::index_out_of_range("", 4, 2).to_string(),
            "Index out of range: 4 (length 2)"
        );

        let err = CfgTreeError::type_conversion("abc", "integer");
        assert_eq!(
            err.to_string(),
            "Type conversion error: cannot convert abc to integer"
        );
    }
}
