//! Watch engine: raw store mutations in, typed LRP changes out.
//!
//! # Architecture
//!
//! ```text
//! store.subscribe(prefix) ──► RawMutationStream
//!                                  │
//!                                  ▼  (one tokio task per session)
//!                          ┌─────────────────┐
//!                          │ ChangeTranslator│ ◄── SnapshotCache (key → last value)
//!                          │  + RecordCodec  │
//!                          └───────┬─────────┘
//!                                  │ Change<T>
//!                                  ▼
//!                    events (bounded mpsc) ──► caller
//!                    errors (bounded mpsc) ──► caller
//!                    cancel (CancellationToken) ◄── caller
//! ```
//!
//! # Delivery
//!
//! - Changes for one key arrive in store order. Nothing is promised across keys.
//! - A full event channel makes the session task wait; changes are never dropped.
//! - Decode errors are delivered without waiting and dropped (with a warning)
//!   when the error channel is full. The subscription error that ends a
//!   session waits for room instead.
//! - A delete of a key the session never saw is dropped silently: there is no
//!   "before" to report.
//!
//! # Lifetime
//!
//! A session runs until [`WatchCanceller::cancel`] is called, the event
//! receiver is dropped, or the subscription fails. It then closes both
//! receivers. After `cancel()` the event receiver yields nothing more, even
//! changes that were already buffered.
//! Nothing reconnects automatically: open a new watch to keep observing.

mod session;
mod snapshot_cache;
mod translator;
mod watcher;


pub use session::ChangeReceiver;
pub use session::SessionState;
pub use session::Watch;
pub use session::WatchCanceller;
pub(crate) use session::WatchSession;
pub use snapshot_cache::SnapshotCache;
pub use translator::ChangeTranslator;
pub use watcher::LrpWatcher;
