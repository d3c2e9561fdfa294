//! Store boundary consumed by the watch engine, plus the bundled back-ends.
//!
//! A store only has to offer plain `get`/`set`/`delete` and a prefix
//! subscription that reports raw `Set`/`Delete` mutations. It does not have to
//! report the value a key held before a mutation; watch sessions keep their own
//! snapshot for that.

mod adaptors;
pub use adaptors::*;

use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
#[cfg(test)]
use mockall::automock;

use crate::StorageError;
use crate::SubscriptionError;

/// One mutation as reported by a store subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMutation {
    /// Key was inserted or overwritten
    Set { key: String, value: Bytes },
    /// Key was removed
    Delete { key: String },
}

impl RawMutation {
    pub fn key(&self) -> &str {
        match self {
            RawMutation::Set { key, .. } | RawMutation::Delete { key } => key,
        }
    }
}

/// Raw mutations under one prefix, in store order per key.
///
/// An `Err` item is terminal: the subscription cannot continue after it.
pub type RawMutationStream =
    Pin<Box<dyn Stream<Item = Result<RawMutation, SubscriptionError>> + Send + 'static>>;

#[cfg_attr(test, automock)]
pub trait WatchableStore: Send + Sync + 'static {
    /// Start reporting every mutation of a key starting with `prefix`.
    ///
    /// The subscription is registered before this returns, so mutations
    /// written afterwards are never missed. Dropping the stream cancels the
    /// subscription.
    fn subscribe(
        &self,
        prefix: &str,
    ) -> Result<RawMutationStream, SubscriptionError>;

    fn get(
        &self,
        key: &str,
    ) -> Result<Option<Bytes>, StorageError>;

    fn set(
        &self,
        key: &str,
        value: Bytes,
    ) -> Result<(), StorageError>;

    /// Returns whether the key held a value
    fn delete(
        &self,
        key: &str,
    ) -> Result<bool, StorageError>;
}
