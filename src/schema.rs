//! Store key layout for LRP records.
//!
//! ```text
//! /v1/desired/<process_guid>
//! /v1/actual/<process_guid>/<index>/<instance_guid>
//! ```
//!
//! Writers and watchers must agree on this layout; a watch is opened on the
//! schema root followed by `/`.

use crate::models::ActualLRP;
use crate::models::DesiredLRP;

pub const DESIRED_LRP_SCHEMA_ROOT: &str = "/v1/desired";
pub const ACTUAL_LRP_SCHEMA_ROOT: &str = "/v1/actual";

pub fn desired_lrp_schema_path(lrp: &DesiredLRP) -> String {
    desired_lrp_schema_path_by_process_guid(&lrp.process_guid)
}

pub fn desired_lrp_schema_path_by_process_guid(process_guid: &str) -> String {
    format!("{DESIRED_LRP_SCHEMA_ROOT}/{process_guid}")
}

/// Directory holding every instance of one process, usable as a key prefix
pub fn actual_lrp_process_dir(process_guid: &str) -> String {
    format!("{ACTUAL_LRP_SCHEMA_ROOT}/{process_guid}/")
}

pub fn actual_lrp_schema_path(lrp: &ActualLRP) -> String {
    format!(
        "{}{}/{}",
        actual_lrp_process_dir(&lrp.process_guid),
        lrp.index,
        lrp.instance_guid
    )
}
