use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::EzCcip`] dispatcher.
#[derive(Metrics, Clone)]
#[metrics(scope = "ezccip")]
pub struct DispatchMetrics {
    /// The number of dispatched calls, including multicall elements.
    pub calls: Counter,
    /// The number of failed calls, including isolated multicall elements.
    pub failed_calls: Counter,
    /// The duration of a full read request.
    pub read_duration: Histogram,
}
