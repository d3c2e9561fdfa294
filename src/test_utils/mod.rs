//! Fixtures shared by unit tests

use std::fmt::Debug;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio::time::Duration;

use crate::codec::BincodeCodec;
use crate::codec::RecordCodec;
use crate::models::ActualLRP;
use crate::models::ActualLRPState;
use crate::models::Change;
use crate::models::DesiredLRP;
use crate::models::LrpRecord;
use crate::models::PortMapping;
use crate::ChangeReceiver;
use crate::RawMutation;

pub(crate) const RECV_TIMEOUT: Duration = Duration::from_millis(500);
pub(crate) const QUIET_PERIOD: Duration = Duration::from_millis(100);

pub(crate) fn desired_lrp(
    process_guid: &str,
    instances: u32,
) -> DesiredLRP {
    DesiredLRP {
        process_guid: process_guid.to_string(),
        instances,
        stack: "some-stack".to_string(),
        memory_mb: 1024,
        disk_mb: 512,
        routes: vec!["route-1".to_string(), "route-2".to_string()],
    }
}

pub(crate) fn actual_lrp(
    process_guid: &str,
    state: ActualLRPState,
) -> ActualLRP {
    ActualLRP {
        process_guid: process_guid.to_string(),
        instance_guid: "some-instance-guid".to_string(),
        executor_id: "some-executor".to_string(),
        index: 0,
        host: "10.0.0.1".to_string(),
        ports: vec![PortMapping {
            container_port: 8080,
            host_port: 61000,
        }],
        since: 1_000,
        state,
    }
}

pub(crate) fn set_mutation<T: LrpRecord>(record: &T) -> RawMutation {
    RawMutation::Set {
        key: record.schema_path(),
        value: BincodeCodec::<T>::new().encode(record).unwrap(),
    }
}

pub(crate) fn delete_mutation<T: LrpRecord>(record: &T) -> RawMutation {
    RawMutation::Delete {
        key: record.schema_path(),
    }
}

/// Endpoint the helpers below can read from
#[allow(async_fn_in_trait)]
pub(crate) trait TestReceiver {
    type Item: Debug;

    async fn next_item(&mut self) -> Option<Self::Item>;
}

impl<T: Debug> TestReceiver for mpsc::Receiver<T> {
    type Item = T;

    async fn next_item(&mut self) -> Option<T> {
        self.recv().await
    }
}

impl<T: Debug> TestReceiver for ChangeReceiver<T> {
    type Item = Change<T>;

    async fn next_item(&mut self) -> Option<Change<T>> {
        self.recv().await
    }
}

/// Receive the next item or fail the test after [`RECV_TIMEOUT`]
pub(crate) async fn recv_next<R: TestReceiver>(rx: &mut R) -> R::Item {
    timeout(RECV_TIMEOUT, rx.next_item())
        .await
        .expect("Timeout waiting for item")
        .expect("Channel closed")
}

/// Assert nothing arrives during [`QUIET_PERIOD`]
pub(crate) async fn assert_quiet<R: TestReceiver>(rx: &mut R) {
    let result = timeout(QUIET_PERIOD, rx.next_item()).await;
    assert!(result.is_err(), "Unexpected item: {:?}", result);
}

/// Drain until the channel closes, failing after [`RECV_TIMEOUT`]
pub(crate) async fn drain_until_closed<R: TestReceiver>(rx: &mut R) -> Vec<R::Item> {
    let mut items = Vec::new();
    loop {
        match timeout(RECV_TIMEOUT, rx.next_item()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => return items,
            Err(_) => panic!("Channel not closed in time, drained so far: {:?}", items),
        }
    }
}
