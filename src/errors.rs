//! LRP Watch Error Hierarchy
//!
//! Errors are split by how far they reach:
//! - [`DecodeError`] is local to one mutation and never ends a watch session
//! - [`SubscriptionError`] is global to a session and always ends it
//! - [`StorageError`] covers the store back-ends and the write-side facade

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Store back-end and record encoding failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Failures surfaced by a watch session
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Embedded database errors
    #[error(transparent)]
    SledError(#[from] sled::Error),

    /// Record serialization failures on the write path
    #[error(transparent)]
    BincodeError(#[from] bincode::Error),

    /// Stored key is not valid UTF-8
    #[error("Key is not valid UTF-8: {0:?}")]
    InvalidKey(Vec<u8>),
}

/// Everything a caller can receive on a watch session's error endpoint.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// A watched value could not be decoded. The session keeps running.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The underlying subscription failed. The session is closed after this.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),
}

impl WatchError {
    /// Whether receiving this error means the session has ended.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WatchError::Subscription(_))
    }
}

/// A raw value under a watched prefix that does not parse into the expected record.
#[derive(Debug, thiserror::Error)]
#[error("Failed to decode {kind} record at key {key}: {source}")]
pub struct DecodeError {
    pub key: String,
    pub kind: &'static str,
    #[source]
    pub source: bincode::Error,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionError {
    /// The store refused to establish the subscription
    #[error("Subscribe to prefix {prefix} failed: {reason}")]
    SubscribeFailed { prefix: String, reason: String },

    /// The store can no longer resume the watch (history compacted or too stale)
    #[error("Watch on prefix {prefix} lost history and cannot resume")]
    HistoryLost { prefix: String },

    /// The mutation stream ended without an explicit error
    #[error("Mutation source for prefix {prefix} closed unexpectedly")]
    SourceClosed { prefix: String },
}

impl SubscriptionError {
    pub fn prefix(&self) -> &str {
        match self {
            SubscriptionError::SubscribeFailed { prefix, .. }
            | SubscriptionError::HistoryLost { prefix }
            | SubscriptionError::SourceClosed { prefix } => prefix,
        }
    }
}
