use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use super::invalid;
use crate::Result;

/// Buffering parameters for watch sessions
///
/// # Configuration Example
///
/// ```toml
/// [watch]
/// event_buffer_size = 64
/// error_buffer_size = 16
/// source_buffer_size = 256
/// source_poll_interval_ms = 100
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Capacity of each session's change event channel
    ///
    /// When the caller falls behind and the channel is full, the session task
    /// waits for capacity instead of dropping changes.
    ///
    /// **Default**: 64
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Capacity of each session's error channel
    ///
    /// Errors are delivered without waiting. If the caller does not drain the
    /// error channel and it fills up, further errors are logged and dropped.
    ///
    /// **Default**: 16
    #[serde(default = "default_error_buffer_size")]
    pub error_buffer_size: usize,

    /// Capacity of the channel between a store subscription and its session
    ///
    /// Only used by store back-ends that forward from a dedicated thread (sled).
    ///
    /// **Default**: 256
    #[serde(default = "default_source_buffer_size")]
    pub source_buffer_size: usize,

    /// How often a forwarding thread wakes up to check whether its session is gone
    ///
    /// **Default**: 100ms
    #[serde(default = "default_source_poll_interval_ms")]
    pub source_poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: default_event_buffer_size(),
            error_buffer_size: default_error_buffer_size(),
            source_buffer_size: default_source_buffer_size(),
            source_poll_interval_ms: default_source_poll_interval_ms(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(invalid("watch.event_buffer_size must be greater than 0"));
        }

        if self.error_buffer_size == 0 {
            return Err(invalid("watch.error_buffer_size must be greater than 0"));
        }

        if self.source_buffer_size == 0 {
            return Err(invalid("watch.source_buffer_size must be greater than 0"));
        }

        if self.source_poll_interval_ms == 0 {
            return Err(invalid("watch.source_poll_interval_ms must be at least 1ms"));
        }

        if self.event_buffer_size > 100_000 {
            warn!(
                "watch.event_buffer_size ({}) is very large; each open session may hold that many changes in memory",
                self.event_buffer_size
            );
        }

        Ok(())
    }
}

fn default_event_buffer_size() -> usize {
    64
}
fn default_error_buffer_size() -> usize {
    16
}
fn default_source_buffer_size() -> usize {
    256
}
// in ms
fn default_source_poll_interval_ms() -> u64 {
    100
}
