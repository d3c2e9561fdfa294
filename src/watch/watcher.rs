use std::sync::Arc;

use super::Watch;
use super::WatchSession;
use crate::codec::BincodeCodec;
use crate::models::ActualLRP;
use crate::models::DesiredLRP;
use crate::models::LrpRecord;
use crate::Result;
use crate::WatchConfig;
use crate::WatchableStore;

/// Opens typed change watches on a shared store.
///
/// Every call opens an independent session with its own subscription and
/// snapshot. Must be used from within a tokio runtime.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let watcher = LrpWatcher::new(store, WatchConfig::default())?;
///
/// let (mut events, cancel, _errors) = watcher.watch_for_desired_lrp_changes().into_parts();
/// while let Some(change) = events.recv().await {
///     println!("{:?} -> {:?}", change.before(), change.after());
/// }
/// cancel.cancel();
/// ```
#[derive(Debug)]
pub struct LrpWatcher<S> {
    store: Arc<S>,
    config: WatchConfig,
}

impl<S> Clone for LrpWatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: WatchableStore> LrpWatcher<S> {
    /// Fails if `config` does not pass [`WatchConfig::validate`]
    pub fn new(
        store: Arc<S>,
        config: WatchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn watch_for_desired_lrp_changes(&self) -> Watch<DesiredLRP> {
        self.watch::<DesiredLRP>()
    }

    pub fn watch_for_actual_lrp_changes(&self) -> Watch<ActualLRP> {
        self.watch::<ActualLRP>()
    }

    /// Open a watch on every record of kind `T`
    pub fn watch<T: LrpRecord>(&self) -> Watch<T> {
        WatchSession::spawn(
            self.store.as_ref(),
            T::watch_prefix(),
            BincodeCodec::<T>::new(),
            &self.config,
        )
    }
}
