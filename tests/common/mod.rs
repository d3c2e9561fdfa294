#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use lrp_watch::ActualLRP;
use lrp_watch::ActualLRPState;
use lrp_watch::Change;
use lrp_watch::ChangeReceiver;
use lrp_watch::DesiredLRP;
use lrp_watch::LrpBbs;
use lrp_watch::LrpWatcher;
use lrp_watch::MemoryStore;
use lrp_watch::WatchConfig;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);
pub const QUIET_PERIOD: Duration = Duration::from_millis(100);

pub fn memory_bbs() -> (Arc<MemoryStore>, LrpBbs<MemoryStore>, LrpWatcher<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let bbs = LrpBbs::new(store.clone());
    let watcher = LrpWatcher::new(store.clone(), WatchConfig::default()).unwrap();
    (store, bbs, watcher)
}

pub fn some_desired_lrp() -> DesiredLRP {
    DesiredLRP {
        process_guid: "some-process-guid".to_string(),
        instances: 5,
        stack: "some-stack".to_string(),
        memory_mb: 1024,
        disk_mb: 512,
        routes: vec!["route-1".to_string(), "route-2".to_string()],
    }
}

pub fn some_actual_lrp() -> ActualLRP {
    ActualLRP {
        process_guid: "some-process-guid".to_string(),
        instance_guid: "some-instance-guid".to_string(),
        executor_id: "some-executor".to_string(),
        index: 0,
        state: ActualLRPState::Starting,
        ..Default::default()
    }
}

#[allow(async_fn_in_trait)]
pub trait TestReceiver {
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

pub async fn recv_next<R: TestReceiver>(rx: &mut R) -> R::Item {
    timeout(RECV_TIMEOUT, rx.next_item())
        .await
        .expect("Timeout waiting for item")
        .expect("Channel closed")
}

pub async fn assert_quiet<R: TestReceiver>(rx: &mut R) {
    let result = timeout(QUIET_PERIOD, rx.next_item()).await;
    assert!(result.is_err(), "Unexpected item: {:?}", result);
}

pub async fn assert_closed<R: TestReceiver>(rx: &mut R) {
    let item = timeout(RECV_TIMEOUT, rx.next_item())
        .await
        .expect("Channel not closed in time");
    assert!(item.is_none(), "Unexpected item: {:?}", item);
}
