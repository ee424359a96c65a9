use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::ProtocolSigner`].
#[derive(Metrics, Clone)]
#[metrics(scope = "signer")]
pub struct SignerMetrics {
    /// The signing duration.
    pub signing_duration: Histogram,
    /// The number of signed envelopes.
    pub signed_envelopes: Counter,
}
