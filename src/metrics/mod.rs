use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::IntGaugeVec;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::error;


lazy_static! {
    pub static ref WATCH_CHANGES_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new("lrp_watch_changes_total", "Changes delivered to watch callers"),
        &["kind", "change"]
    )
    .expect("metric can not be created");

    pub static ref WATCH_DECODE_ERRORS_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new("lrp_watch_decode_errors_total", "Watched values that failed to decode"),
        &["kind"]
    )
    .expect("metric can not be created");

    pub static ref ACTIVE_WATCH_SESSIONS_METRIC: IntGaugeVec = IntGaugeVec::new(
        Opts::new("lrp_watch_active_sessions", "Watch sessions not yet closed"),
        &["kind"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        registry
            .register(Box::new(WATCH_CHANGES_METRIC.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(WATCH_DECODE_ERRORS_METRIC.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(ACTIVE_WATCH_SESSIONS_METRIC.clone()))
            .expect("collector can be registered");
        registry
    };
}

/// Render every registered metric in the Prometheus text format
pub fn gather_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode metrics: {:?}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
