//! Typed change notifications for long-running-process records.
//!
//! Desired LRPs (what should run) and actual LRPs (what is running) live in a
//! hierarchical key-value store. [`LrpWatcher`] subscribes to a key prefix and
//! turns the store's raw set/delete mutations into [`Change`] values carrying
//! the record before and after each mutation.

pub mod bbs;
pub mod codec;
mod config;
mod errors;
mod metrics;
pub mod models;
pub mod schema;
mod storage;
mod watch;

pub use bbs::LrpBbs;
pub use self::config::*;
pub use errors::*;
pub use metrics::gather_metrics;
pub use models::ActualLRP;
pub use models::ActualLRPChange;
pub use models::ActualLRPState;
pub use models::Change;
pub use models::ChangeKind;
pub use models::DesiredLRP;
pub use models::DesiredLRPChange;
pub use storage::*;
pub use watch::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
