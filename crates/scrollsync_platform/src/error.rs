//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// An attribute value could not be interpreted
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),
}
