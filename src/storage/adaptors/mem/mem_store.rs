//! In-memory [`WatchableStore`] used for embedded setups and deterministic tests.
//!
//! Mutations are fanned out to subscribers while the data lock is still held,
//! so two writers racing on one key are reported in the order they were
//! applied. Subscriber queues are unbounded: a slow watcher never blocks a
//! writer.

use std::collections::BTreeMap;
use std::pin::Pin;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;
use std::task::Context;
use std::task::Poll;

use bytes::Bytes;
use dashmap::DashMap;
use futures::Stream;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::trace;

use crate::RawMutation;
use crate::RawMutationStream;
use crate::StorageError;
use crate::SubscriptionError;
use crate::WatchableStore;

type MutationSender = mpsc::UnboundedSender<Result<RawMutation, SubscriptionError>>;

#[derive(Debug)]
struct Subscriber {
    prefix: String,
    sender: MutationSender,
}

#[derive(Debug)]
struct MemoryStoreInner {
    data: RwLock<BTreeMap<String, Bytes>>,
    subscribers: DashMap<u64, Subscriber>,
    next_id: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                data: RwLock::new(BTreeMap::new()),
                subscribers: DashMap::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Terminate every live subscription as if the store could no longer
    /// resume them (history compacted past their position).
    pub fn expire_watches(&self) {
        let _data = self.inner.data.write();
        let ids: Vec<u64> = self.inner.subscribers.iter().map(|s| *s.key()).collect();
        for id in ids {
            if let Some((_, subscriber)) = self.inner.subscribers.remove(&id) {
                let _ = subscriber.sender.send(Err(SubscriptionError::HistoryLost {
                    prefix: subscriber.prefix.clone(),
                }));
                debug!(subscriber_id = id, prefix = %subscriber.prefix, "Watch expired");
            }
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn len(&self) -> usize {
        self.inner.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.data.read().is_empty()
    }

    /// Must be called with the data write lock held.
    fn notify(
        &self,
        mutation: RawMutation,
    ) {
        let mut closed = Vec::new();
        for subscriber in self.inner.subscribers.iter() {
            if !mutation.key().starts_with(&subscriber.prefix) {
                continue;
            }
            if subscriber.sender.send(Ok(mutation.clone())).is_err() {
                closed.push(*subscriber.key());
            }
        }
        for id in closed {
            self.inner.subscribers.remove(&id);
        }

        trace!(key = %mutation.key(), "Mutation dispatched");
    }
}

impl WatchableStore for MemoryStore {
    fn subscribe(
        &self,
        prefix: &str,
    ) -> Result<RawMutationStream, SubscriptionError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();

        self.inner.subscribers.insert(
            id,
            Subscriber {
                prefix: prefix.to_string(),
                sender,
            },
        );

        trace!(subscriber_id = id, prefix = %prefix, "Subscriber registered");

        Ok(Box::pin(MemorySubscription {
            id,
            store: Arc::downgrade(&self.inner),
            receiver,
        }))
    }

    fn get(
        &self,
        key: &str,
    ) -> Result<Option<Bytes>, StorageError> {
        Ok(self.inner.data.read().get(key).cloned())
    }

    fn set(
        &self,
        key: &str,
        value: Bytes,
    ) -> Result<(), StorageError> {
        let mut data = self.inner.data.write();
        data.insert(key.to_string(), value.clone());
        self.notify(RawMutation::Set {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    fn delete(
        &self,
        key: &str,
    ) -> Result<bool, StorageError> {
        let mut data = self.inner.data.write();
        if data.remove(key).is_none() {
            return Ok(false);
        }
        self.notify(RawMutation::Delete {
            key: key.to_string(),
        });
        Ok(true)
    }
}

/// Receiving side of one subscription; unregisters itself when dropped.
struct MemorySubscription {
    id: u64,
    store: Weak<MemoryStoreInner>,
    receiver: mpsc::UnboundedReceiver<Result<RawMutation, SubscriptionError>>,
}

impl Stream for MemorySubscription {
    type Item = Result<RawMutation, SubscriptionError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.subscribers.remove(&self.id);
        }
        trace!(subscriber_id = self.id, "Subscriber unregistered");
    }
}
