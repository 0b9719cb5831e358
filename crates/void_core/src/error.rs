//! Error types for the core library

use thiserror::Error;

/// The core error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Tag failed validation
    #[error("Invalid tag '{tag}': {reason}")]
    InvalidTag { tag: Box<str>, reason: &'static str },
}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;
