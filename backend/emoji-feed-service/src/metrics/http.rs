use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};
use std::time::Duration;

/// Route label for requests that matched no registered resource
pub const UNMATCHED_ROUTE: &str = "unmatched";

lazy_static! {
    /// HTTP requests by method, route pattern and status code.
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "emoji_feed_http_requests_total",
        "Total HTTP requests handled by the API scope",
        &["method", "route", "status"]
    )
    .expect("failed to register emoji_feed_http_requests_total");

    /// HTTP request latency by method, route pattern and status code.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "emoji_feed_http_request_duration_seconds",
        "HTTP request latency for the API scope",
        &["method", "route", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("failed to register emoji_feed_http_request_duration_seconds");
}

/// Record one finished request. `route` is the matched pattern
/// (`/api/v1/posts/{post_id}`), never the raw path.
pub fn observe_http_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    let status = status.to_string();
    let labels = [method, route, status.as_str()];

    HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&labels)
        .observe(elapsed.as_secs_f64());
}
