use serde::Deserialize;
use serde::Serialize;

use super::LrpRecord;
use crate::schema::actual_lrp_schema_path;
use crate::schema::ACTUAL_LRP_SCHEMA_ROOT;

/// Lifecycle state of one running instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActualLRPState {
    #[default]
    Starting,
    Running,
    Crashed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortMapping {
    pub container_port: u32,
    pub host_port: u32,
}

/// Observed runtime state of one LRP instance, as reported by an executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActualLRP {
    pub process_guid: String,
    pub instance_guid: String,
    pub executor_id: String,
    pub index: u32,
    pub host: String,
    pub ports: Vec<PortMapping>,
    /// Unix nanos of the last state transition
    pub since: i64,
    pub state: ActualLRPState,
}

impl LrpRecord for ActualLRP {
    const KIND: &'static str = "actual_lrp";

    fn watch_prefix() -> String {
        format!("{ACTUAL_LRP_SCHEMA_ROOT}/")
    }

    fn schema_path(&self) -> String {
        actual_lrp_schema_path(self)
    }
}
