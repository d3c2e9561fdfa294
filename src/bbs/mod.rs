//! Write side of the LRP records: thin wrappers that put records at their
//! canonical keys. Watches observe these writes; they never call them.

mod lrp_bbs;
pub use lrp_bbs::*;
