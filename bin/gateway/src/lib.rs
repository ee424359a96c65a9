//! The ezccip http gateway.
//!
//! Serves an [`ezccip::EzCcip`] dispatcher over http with ENSIP-10 answered from static JSON
//! records. The request path selects the origin responses are signed for.

mod args;
pub use args::{default_signer, GatewayArgs, SignerArgs};

pub mod constants;

mod metrics;
pub use metrics::GatewayMetrics;

mod origin;
pub use origin::OriginResolver;

mod records;
pub use records::{RecordsError, StaticAbi, StaticPubkey, StaticRecord, StaticRecords};

mod server;
pub use server::{Gateway, ReadRequest};
