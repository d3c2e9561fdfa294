mod sled_store;
pub use sled_store::*;

#[cfg(test)]
mod sled_store_test;

use crate::StorageError;

/// Sled tree holding LRP records
const LRP_RECORDS_TREE: &str = "lrp_records";

#[doc(hidden)]
pub fn init_sled_lrp_tree(
    sled_db_root_path: impl AsRef<std::path::Path> + std::fmt::Debug
) -> Result<sled::Tree, StorageError> {
    tracing::debug!("init_sled_lrp_tree from path: {:?}", &sled_db_root_path);

    let db = sled::Config::default()
        .path(sled_db_root_path)
        .use_compression(true)
        .open()?;
    Ok(db.open_tree(LRP_RECORDS_TREE)?)
}
