//! Error types for registry operations.

use thiserror::Error;

/// Errors returned by registry operations.
///
/// All errors are local and synchronous. Destroying an absent key is not
/// an error (destroy is idempotent); updating an absent key is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TeleportError {
    /// `update` referenced a key with no registered teleport.
    #[error("no teleport registered under key `{0}`")]
    NotFound(String),

    /// The required destination name was empty.
    #[error("teleport destination must not be empty")]
    InvalidDestination,

    /// A teleport with this key already exists and the registry is
    /// configured with [`DuplicateKeyPolicy::Reject`].
    ///
    /// [`DuplicateKeyPolicy::Reject`]: crate::registry::DuplicateKeyPolicy::Reject
    #[error("a teleport with key `{0}` already exists")]
    DuplicateKey(String),
}
