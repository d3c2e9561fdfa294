//! Long-running-process records and the change notifications built from them.

mod actual_lrp;
mod change;
mod desired_lrp;
pub use actual_lrp::*;
pub use change::*;
pub use desired_lrp::*;


use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Capability shared by every record kind a watch can be opened on.
///
/// The watch engine is written once against this trait and instantiated per
/// record kind; a kind only has to say what it is called and where it lives.
pub trait LrpRecord:
    Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static
{
    /// Short name used in logs, metrics and decode errors
    const KIND: &'static str;

    /// Key prefix under which every record of this kind is stored
    fn watch_prefix() -> String;

    /// Canonical store key of this record
    fn schema_path(&self) -> String;
}
