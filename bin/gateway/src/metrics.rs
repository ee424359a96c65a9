use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// The metrics for the gateway http server.
#[derive(Metrics, Clone)]
#[metrics(scope = "gateway")]
pub struct GatewayMetrics {
    /// The number of read requests.
    pub requests: Counter,
    /// The number of read requests answered with an error.
    pub failed_requests: Counter,
    /// The duration of a read request, including body parsing.
    pub request_duration: Histogram,
}
