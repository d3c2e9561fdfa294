use bytes::Bytes;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::time::timeout;
use tokio::time::Duration;

use super::*;
use crate::RawMutation;
use crate::WatchConfig;
use crate::WatchableStore;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

fn open_store() -> (SledStore, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = WatchConfig {
        source_poll_interval_ms: 10,
        ..Default::default()
    };
    let store = SledStore::open(temp_dir.path(), &config).unwrap();
    (store, temp_dir)
}

#[tokio::test]
async fn test_set_get_delete() {
    let (store, _dir) = open_store();

    store.set("/v1/desired/a", Bytes::from("1")).unwrap();
    assert_eq!(store.get("/v1/desired/a").unwrap(), Some(Bytes::from("1")));

    assert!(store.delete("/v1/desired/a").unwrap());
    assert!(!store.delete("/v1/desired/a").unwrap());
    assert_eq!(store.get("/v1/desired/a").unwrap(), None);
}

#[tokio::test]
async fn test_watch_prefix_forwards_inserts_and_removes() {
    let (store, _dir) = open_store();
    let mut stream = store.subscribe("/v1/desired/").unwrap();

    store.set("/v1/actual/g/0/i", Bytes::from("ignored")).unwrap();
    store.set("/v1/desired/g", Bytes::from("v1")).unwrap();
    store.delete("/v1/desired/g").unwrap();

    let first = timeout(RECV_TIMEOUT, stream.next())
        .await
        .expect("Timeout")
        .expect("Stream closed")
        .unwrap();
    assert_eq!(
        first,
        RawMutation::Set {
            key: "/v1/desired/g".to_string(),
            value: Bytes::from("v1"),
        }
    );

    let second = timeout(RECV_TIMEOUT, stream.next())
        .await
        .expect("Timeout")
        .expect("Stream closed")
        .unwrap();
    assert_eq!(
        second,
        RawMutation::Delete {
            key: "/v1/desired/g".to_string()
        }
    );
}
