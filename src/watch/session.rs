use futures::StreamExt;
use nanoid::nanoid;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::info_span;
use tracing::trace;
use tracing::warn;
use tracing::Instrument;

use super::ChangeTranslator;
use crate::codec::RecordCodec;
use crate::metrics::ACTIVE_WATCH_SESSIONS_METRIC;
use crate::metrics::WATCH_CHANGES_METRIC;
use crate::metrics::WATCH_DECODE_ERRORS_METRIC;
use crate::models::Change;
use crate::models::LrpRecord;
use crate::RawMutationStream;
use crate::SubscriptionError;
use crate::WatchConfig;
use crate::WatchError;
use crate::WatchableStore;

/// Lifecycle of a watch session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Translating and delivering changes
    Active,
    /// Stopped pulling mutations, releasing the subscription
    Draining,
    /// Terminal: both receivers are closed
    Closed,
}

/// Caller-side cancellation handle of one watch session.
///
/// `cancel()` is idempotent and never blocks: calling it repeatedly, or after
/// the session has already closed, has no further effect.
#[derive(Debug, Clone)]
pub struct WatchCanceller {
    token: CancellationToken,
    state: watch::Receiver<SessionState>,
}

impl WatchCanceller {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the session has released its subscription and closed both
    /// receivers.
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == SessionState::Closed).await;
    }
}

/// Event endpoint of a watch.
///
/// Once the session is cancelled, `recv` returns `None` even if changes were
/// still buffered.
#[derive(Debug)]
pub struct ChangeReceiver<T> {
    receiver: mpsc::Receiver<Change<T>>,
    token: CancellationToken,
}

impl<T> ChangeReceiver<T> {
    /// Next change in store order, or `None` once the watch is cancelled or
    /// the session has ended.
    pub async fn recv(&mut self) -> Option<Change<T>> {
        if self.token.is_cancelled() {
            self.close();
            return None;
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                self.close();
                None
            }
            change = self.receiver.recv() => change,
        }
    }

    /// Stop accepting changes and discard the buffered ones
    pub fn close(&mut self) {
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }
}

/// The three endpoints of an open watch
#[derive(Debug)]
pub struct Watch<T> {
    pub events: ChangeReceiver<T>,
    pub cancel: WatchCanceller,
    pub errors: mpsc::Receiver<WatchError>,
}

impl<T> Watch<T> {
    pub fn into_parts(self) -> (ChangeReceiver<T>, WatchCanceller, mpsc::Receiver<WatchError>) {
        (self.events, self.cancel, self.errors)
    }
}

#[derive(Debug)]
enum StopReason {
    Cancelled,
    ReceiverDropped,
    SourceFailed,
}

/// Background half of a watch: owns the subscription and the snapshot.
pub(crate) struct WatchSession<C: RecordCodec> {
    prefix: String,
    source: RawMutationStream,
    translator: ChangeTranslator<C>,
    events: mpsc::Sender<Change<C::Record>>,
    errors: mpsc::Sender<WatchError>,
    token: CancellationToken,
    state: watch::Sender<SessionState>,
}

impl<C: RecordCodec> WatchSession<C> {
    /// Subscribe to `prefix` and start translating on a new tokio task.
    ///
    /// The subscription is in place when this returns. If it cannot be
    /// established, the returned watch is already closed and its error
    /// receiver holds the subscription error.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub(crate) fn spawn<S>(
        store: &S,
        prefix: String,
        codec: C,
        config: &WatchConfig,
    ) -> Watch<C::Record>
    where
        S: WatchableStore + ?Sized,
    {
        let kind = <C::Record as LrpRecord>::KIND;
        let session_id = nanoid!();
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer_size);
        let (error_tx, error_rx) = mpsc::channel(config.error_buffer_size);
        let token = CancellationToken::new();

        let source = match store.subscribe(&prefix) {
            Ok(source) => source,
            Err(e) => {
                warn!(session_id = %session_id, prefix = %prefix, kind, "Subscribe failed: {}", e);
                let _ = error_tx.try_send(WatchError::Subscription(e));
                let (_state_tx, state_rx) = watch::channel(SessionState::Closed);
                return Watch {
                    events: ChangeReceiver {
                        receiver: event_rx,
                        token: token.clone(),
                    },
                    cancel: WatchCanceller {
                        token,
                        state: state_rx,
                    },
                    errors: error_rx,
                };
            }
        };

        let (state_tx, state_rx) = watch::channel(SessionState::Active);
        let session = WatchSession {
            prefix,
            source,
            translator: ChangeTranslator::new(codec),
            events: event_tx,
            errors: error_tx,
            token: token.clone(),
            state: state_tx,
        };

        let span = info_span!("watch_session", session_id = %session_id, kind);
        tokio::spawn(session.run().instrument(span));

        Watch {
            events: ChangeReceiver {
                receiver: event_rx,
                token: token.clone(),
            },
            cancel: WatchCanceller {
                token,
                state: state_rx,
            },
            errors: error_rx,
        }
    }

    async fn run(mut self) {
        let kind = <C::Record as LrpRecord>::KIND;
        ACTIVE_WATCH_SESSIONS_METRIC.with_label_values(&[kind]).inc();
        info!(prefix = %self.prefix, "Watch session started");

        let reason = self.pump().await;

        self.state.send_replace(SessionState::Draining);
        debug!(reason = ?reason, "Watch session draining");

        let WatchSession {
            source,
            translator,
            events,
            errors,
            state,
            ..
        } = self;
        drop(source);
        drop(translator);
        drop(events);
        drop(errors);

        ACTIVE_WATCH_SESSIONS_METRIC.with_label_values(&[kind]).dec();
        state.send_replace(SessionState::Closed);
        info!(reason = ?reason, "Watch session closed");
    }

    async fn pump(&mut self) -> StopReason {
        let kind = <C::Record as LrpRecord>::KIND;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => return StopReason::Cancelled,
                _ = self.events.closed() => return StopReason::ReceiverDropped,
                next = self.source.next() => next,
            };

            let mutation = match next {
                Some(Ok(mutation)) => mutation,
                Some(Err(e)) => {
                    warn!("Subscription failed: {}", e);
                    return self.report_fatal(e).await;
                }
                None => {
                    let e = SubscriptionError::SourceClosed {
                        prefix: self.prefix.clone(),
                    };
                    warn!("{}", e);
                    return self.report_fatal(e).await;
                }
            };

            match self.translator.translate(mutation) {
                Ok(Some(change)) => {
                    let change_kind = change.kind();
                    tokio::select! {
                        biased;
                        _ = self.token.cancelled() => return StopReason::Cancelled,
                        sent = self.events.send(change) => {
                            if sent.is_err() {
                                return StopReason::ReceiverDropped;
                            }
                        }
                    }
                    WATCH_CHANGES_METRIC
                        .with_label_values(&[kind, change_kind.as_str()])
                        .inc();
                    trace!(change = change_kind.as_str(), "Change delivered");
                }
                Ok(None) => {}
                Err(e) => {
                    WATCH_DECODE_ERRORS_METRIC.with_label_values(&[kind]).inc();
                    warn!("{}", e);
                    self.report(WatchError::Decode(e));
                }
            }
        }
    }

    /// Deliver the error that ends the session. Waits for error channel
    /// capacity so it cannot be lost behind undrained decode errors.
    async fn report_fatal(
        &mut self,
        error: SubscriptionError,
    ) -> StopReason {
        tokio::select! {
            biased;
            sent = self.errors.send(WatchError::Subscription(error)) => {
                if sent.is_err() {
                    trace!("Error receiver dropped");
                }
                StopReason::SourceFailed
            }
            _ = self.token.cancelled() => StopReason::Cancelled,
        }
    }

    /// Hand a non-fatal error to the caller without waiting for channel capacity
    fn report(
        &self,
        error: WatchError,
    ) {
        match self.errors.try_send(error) {
            Ok(()) => {}
            Err(TrySendError::Full(error)) => {
                warn!("Error receiver is full, dropping: {}", error);
            }
            Err(TrySendError::Closed(_)) => {
                trace!("Error receiver dropped");
            }
        }
    }
}
