use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_int_counter, register_int_counter_vec, register_int_gauge, Counter,
    Encoder, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

// Prometheus metrics (default registry)
pub static FEEDINGS_RECORDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "hatchery_feedings_recorded_total",
        "Total feeding records created"
    )
    .expect("register feedings_recorded_total")
});

pub static FEED_DISPATCHED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "hatchery_feed_dispatched_total",
        "Feed quantity drawn from stores by new feeding records, in store units"
    )
    .expect("register feed_dispatched_total")
});

pub static STOCK_REJECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "hatchery_stock_rejections_total",
        "Total feeding mutations rejected for insufficient stock"
    )
    .expect("register stock_rejections_total")
});

pub static EVENTS_PUBLISHED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "hatchery_events_published_total",
        "Change events published, by topic",
        &["topic"]
    )
    .expect("register events_published_total")
});

pub static WS_CLIENTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "hatchery_ws_clients",
        "Currently connected live-update clients"
    )
    .expect("register ws_clients")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
