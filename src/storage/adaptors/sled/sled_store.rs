//! Sled-backed [`WatchableStore`].
//!
//! `Tree::watch_prefix` hands out a blocking subscriber, so every subscription
//! gets a forwarding thread that moves sled events into a bounded tokio
//! channel. The thread wakes up every `source_poll_interval_ms` to notice that
//! its session has gone away.

use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::init_sled_lrp_tree;
use crate::RawMutation;
use crate::RawMutationStream;
use crate::StorageError;
use crate::SubscriptionError;
use crate::WatchConfig;
use crate::WatchableStore;

type MutationSender = mpsc::Sender<Result<RawMutation, SubscriptionError>>;

#[derive(Debug, Clone)]
pub struct SledStore {
    tree: sled::Tree,
    source_buffer_size: usize,
    poll_interval: Duration,
}

impl SledStore {
    /// Open (or create) the LRP tree under `path`
    pub fn open(
        path: impl AsRef<std::path::Path> + std::fmt::Debug,
        config: &WatchConfig,
    ) -> Result<Self, StorageError> {
        Ok(Self::from_tree(init_sled_lrp_tree(path)?, config))
    }

    pub fn from_tree(
        tree: sled::Tree,
        config: &WatchConfig,
    ) -> Self {
        Self {
            tree,
            source_buffer_size: config.source_buffer_size,
            poll_interval: Duration::from_millis(config.source_poll_interval_ms),
        }
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.tree.flush()?;
        Ok(())
    }
}

impl WatchableStore for SledStore {
    fn subscribe(
        &self,
        prefix: &str,
    ) -> Result<RawMutationStream, SubscriptionError> {
        let subscriber = self.tree.watch_prefix(prefix.as_bytes());
        let (sender, receiver) = mpsc::channel(self.source_buffer_size);
        let poll_interval = self.poll_interval;
        let thread_prefix = prefix.to_string();

        std::thread::Builder::new()
            .name(format!("sled-watch:{prefix}"))
            .spawn(move || forward_events(subscriber, sender, thread_prefix, poll_interval))
            .map_err(|e| SubscriptionError::SubscribeFailed {
                prefix: prefix.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Box::pin(ReceiverStream::new(receiver)))
    }

    fn get(
        &self,
        key: &str,
    ) -> Result<Option<Bytes>, StorageError> {
        Ok(self.tree.get(key.as_bytes())?.map(|v| Bytes::copy_from_slice(&v)))
    }

    fn set(
        &self,
        key: &str,
        value: Bytes,
    ) -> Result<(), StorageError> {
        self.tree.insert(key.as_bytes(), value.as_ref())?;
        Ok(())
    }

    fn delete(
        &self,
        key: &str,
    ) -> Result<bool, StorageError> {
        Ok(self.tree.remove(key.as_bytes())?.is_some())
    }
}

fn forward_events(
    mut subscriber: sled::Subscriber,
    sender: MutationSender,
    prefix: String,
    poll_interval: Duration,
) {
    debug!(prefix = %prefix, "Sled watch thread started");

    loop {
        match subscriber.next_timeout(poll_interval) {
            Ok(event) => {
                let mutation = match to_raw_mutation(event) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(prefix = %prefix, "Skipping sled event: {:?}", e);
                        continue;
                    }
                };
                trace!(prefix = %prefix, key = %mutation.key(), "Forwarding sled event");
                if sender.blocking_send(Ok(mutation)).is_err() {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if sender.is_closed() {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = sender.blocking_send(Err(SubscriptionError::SourceClosed {
                    prefix: prefix.clone(),
                }));
                break;
            }
        }
    }

    debug!(prefix = %prefix, "Sled watch thread stopped");
}

fn to_raw_mutation(event: sled::Event) -> Result<RawMutation, StorageError> {
    match event {
        sled::Event::Insert { key, value } => Ok(RawMutation::Set {
            key: key_to_string(&key)?,
            value: Bytes::copy_from_slice(&value),
        }),
        sled::Event::Remove { key } => Ok(RawMutation::Delete {
            key: key_to_string(&key)?,
        }),
    }
}

fn key_to_string(key: &sled::IVec) -> Result<String, StorageError> {
    String::from_utf8(key.to_vec()).map_err(|e| StorageError::InvalidKey(e.into_bytes()))
}
