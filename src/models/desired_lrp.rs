use serde::Deserialize;
use serde::Serialize;

use super::LrpRecord;
use crate::schema::desired_lrp_schema_path;
use crate::schema::DESIRED_LRP_SCHEMA_ROOT;

/// Declarative target state of a long-running process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DesiredLRP {
    pub process_guid: String,
    pub instances: u32,
    pub stack: String,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub routes: Vec<String>,
}

impl LrpRecord for DesiredLRP {
    const KIND: &'static str = "desired_lrp";

    fn watch_prefix() -> String {
        format!("{DESIRED_LRP_SCHEMA_ROOT}/")
    }

    fn schema_path(&self) -> String {
        desired_lrp_schema_path(self)
    }
}
