//! Core error types.

use thiserror::Error;

/// Core population errors.
///
/// The type is `Clone` because an in-flight load result is shared by every
/// task waiting on the same cache key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Failure inside the injected loader.
    #[error("loader error: {0}")]
    Loader(String),

    /// Cache key could not be encoded.
    #[error("key encoding error: {0}")]
    KeyEncoding(String),
}

impl Error {
    /// Wrap a loader failure message.
    pub fn loader(message: impl Into<String>) -> Self {
        Self::Loader(message.into())
    }
}
