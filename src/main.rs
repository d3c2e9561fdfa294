use std::fmt::Debug;
use std::sync::Arc;

use lrp_watch::Change;
use lrp_watch::Error;
use lrp_watch::LrpWatcher;
use lrp_watch::Result;
use lrp_watch::SledStore;
use lrp_watch::Watch;
use lrp_watch::WatchCanceller;
use lrp_watch::WatchError;
use lrp_watch::WatchNodeConfig;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::task::JoinHandle;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    init_observability();

    let settings = WatchNodeConfig::new()?.validate()?;
    info!("Loaded configuration: {:?}", settings);

    let store = Arc::new(SledStore::open(&settings.storage.db_root_dir, &settings.watch)?);
    let watcher = LrpWatcher::new(store.clone(), settings.watch.clone())?;

    let (desired_cancel, desired_task) = log_changes("desired", watcher.watch_for_desired_lrp_changes());
    let (actual_cancel, actual_task) = log_changes("actual", watcher.watch_for_actual_lrp_changes());

    info!("Watching LRP changes. Waiting for CTRL+C signal...");
    graceful_shutdown().await?;

    desired_cancel.cancel();
    actual_cancel.cancel();
    for task in [desired_task, actual_task] {
        if let Err(e) = task.await {
            error!("watch logger task failed: {:?}", e);
        }
    }

    store.flush()?;
    info!("Exiting program.");
    Ok(())
}

/// Log every change and error of `watch` until both of its receivers close.
/// The task yields the number of errors it logged.
fn log_changes<T>(
    name: &'static str,
    watch: Watch<T>,
) -> (WatchCanceller, JoinHandle<usize>)
where
    T: Debug + Send + 'static,
{
    let (mut events, cancel, mut errors) = watch.into_parts();
    let handle = tokio::spawn(async move {
        let mut errors_open = true;
        let mut logged_errors = 0;
        loop {
            tokio::select! {
                change = events.recv() => match change {
                    Some(change) => log_change(name, &change),
                    None => break,
                },
                err = errors.recv(), if errors_open => match err {
                    Some(e) => {
                        log_error(name, &e);
                        logged_errors += 1;
                    }
                    None => errors_open = false,
                },
            }
        }
        // The error that ended the session can still be queued
        if errors_open {
            while let Some(e) = errors.recv().await {
                log_error(name, &e);
                logged_errors += 1;
            }
        }
        info!(watch = name, logged_errors, "Watch ended");
        logged_errors
    });
    (cancel, handle)
}

fn log_change<T: Debug>(
    name: &'static str,
    change: &Change<T>,
) {
    info!(
        watch = name,
        change = change.kind().as_str(),
        before = ?change.before(),
        after = ?change.after(),
        "LRP changed"
    );
}

fn log_error(
    name: &'static str,
    e: &WatchError,
) {
    if e.is_fatal() {
        error!(watch = name, "{}", e);
    } else {
        warn!(watch = name, "{}", e);
    }
}

async fn graceful_shutdown() -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| Error::Fatal(format!("Failed to install SIGINT handler: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| Error::Fatal(format!("Failed to install SIGTERM handler: {e}")))?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
    }
    Ok(())
}

fn init_observability() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
