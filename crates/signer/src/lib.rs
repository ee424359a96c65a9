//! A library responsible for signing CCIP-Read response envelopes.
//!
//! The signer is generic and can use any implementation of the `Signer` trait from the
//! `alloy_signer` crate, including local and remote signers such as AWS KMS.
//!
//! Three envelope schemes are supported, see [`Protocol`]. Each binds the resolver origin, an
//! expiry, the request calldata and the response payload under one signature so that an on-chain
//! verifier can trust data that never touched the chain.

use std::{sync::Arc, time::Instant};

use alloy_primitives::{Address, Bytes, Signature};
use alloy_sol_types::SolValue;

mod envelope;
pub use envelope::{decode_envelope, verify_envelope, Envelope, VerifiedResponse};

mod error;
pub use error::SignerError;

mod metrics;
pub use metrics::SignerMetrics;

mod protocol;
pub use protocol::Protocol;

mod signature;
pub use signature::SignatureAsBytes;

/// Signs response payloads into [`Protocol`] envelopes.
#[derive(Clone)]
pub struct ProtocolSigner {
    /// The signer instance.
    signer: Arc<dyn alloy_signer::Signer<Signature> + Send + Sync>,
    /// The signer metrics.
    metrics: SignerMetrics,
}

impl ProtocolSigner {
    /// Creates a new [`ProtocolSigner`] with the provided signer.
    pub fn new(signer: impl alloy_signer::Signer<Signature> + Send + Sync + 'static) -> Self {
        Self::from_arc(Arc::new(signer))
    }

    /// Creates a new [`ProtocolSigner`] from a shared signer.
    pub fn from_arc(signer: Arc<dyn alloy_signer::Signer<Signature> + Send + Sync>) -> Self {
        Self { signer, metrics: SignerMetrics::default() }
    }

    /// Returns the address of the signer, the public identity of the gateway.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Builds the envelope for `response` to `request` under the given protocol.
    pub async fn sign(
        &self,
        protocol: Protocol,
        origin: Address,
        expires: u64,
        request: &[u8],
        response: Bytes,
    ) -> Result<Bytes, SignerError> {
        let Some(hash) = protocol.signing_hash(origin, expires, request, &response) else {
            return Ok(response);
        };

        let now = Instant::now();
        let signature = self.signer.sign_hash(&hash).await?;
        self.metrics.signing_duration.record(now.elapsed().as_secs_f64());
        self.metrics.signed_envelopes.increment(1);
        tracing::trace!(
            target: "ezccip::signer",
            %protocol,
            %origin,
            expires,
            %hash,
            "Signed response"
        );

        let signature = Bytes::copy_from_slice(&signature.sig_as_bytes());
        let data = match protocol {
            Protocol::Ens => (response, expires, signature).abi_encode_params(),
            _ => (signature, expires, response).abi_encode_params(),
        };
        Ok(data.into())
    }
}

impl std::fmt::Debug for ProtocolSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolSigner")
            .field("signer", &"alloy_signer::Signer")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};
    use alloy_signer_local::PrivateKeySigner;

    const ORIGIN: Address = address!("0x0000000000000000000000000000000000000002");

    #[tokio::test]
    async fn test_raw_is_unsigned() {
        let signer = ProtocolSigner::new(PrivateKeySigner::random());
        let response = bytes!("c0ffee");
        let data = signer.sign(Protocol::Raw, ORIGIN, 1, &[0x12], response.clone()).await.unwrap();
        assert_eq!(data, response);
    }

    #[tokio::test]
    async fn test_signed_protocols_recover() {
        let key = PrivateKeySigner::random();
        let signer = ProtocolSigner::new(key.clone());
        let request = bytes!("12345678");
        let response = bytes!("c0ffee");

        for protocol in [Protocol::Ens, Protocol::Tor] {
            let data =
                signer.sign(protocol, ORIGIN, 42, &request, response.clone()).await.unwrap();
            let verified = verify_envelope(protocol, &request, &data, ORIGIN).unwrap();
            assert_eq!(verified.response, response);
            assert_eq!(verified.expires, Some(42));
            assert_eq!(verified.signer, Some(key.address()));
        }
    }

    #[tokio::test]
    async fn test_signing_is_deterministic() {
        let signer = ProtocolSigner::new(PrivateKeySigner::random());
        let a = signer.sign(Protocol::Tor, ORIGIN, 9, &[1], bytes!("01")).await.unwrap();
        let b = signer.sign(Protocol::Tor, ORIGIN, 9, &[1], bytes!("01")).await.unwrap();
        assert_eq!(a, b);
    }
}
