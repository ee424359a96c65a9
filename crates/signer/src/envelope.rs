use super::{Protocol, SignerError};
use alloy_primitives::{Address, Bytes, Signature};
use alloy_sol_types::SolValue;

/// A decoded response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// An unsigned response.
    Raw(Bytes),
    /// A signed response.
    Signed {
        /// The response payload.
        response: Bytes,
        /// The expiry of the signature in unix seconds.
        expires: u64,
        /// The 65 byte signature.
        signature: Bytes,
    },
}

/// A response extracted from an envelope together with the recovered signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedResponse {
    /// The response payload.
    pub response: Bytes,
    /// The expiry, if the protocol carries one.
    pub expires: Option<u64>,
    /// The address that signed the envelope, if the protocol is signed.
    pub signer: Option<Address>,
}

/// Decodes an envelope produced under `protocol`.
pub fn decode_envelope(protocol: Protocol, data: &[u8]) -> Result<Envelope, SignerError> {
    let envelope = match protocol {
        Protocol::Raw => Envelope::Raw(Bytes::copy_from_slice(data)),
        Protocol::Ens => {
            let (response, expires, signature) = <(Bytes, u64, Bytes)>::abi_decode_params(data)?;
            Envelope::Signed { response, expires, signature }
        }
        Protocol::Tor => {
            let (signature, expires, response) = <(Bytes, u64, Bytes)>::abi_decode_params(data)?;
            Envelope::Signed { response, expires, signature }
        }
    };
    Ok(envelope)
}

/// Decodes an envelope and recovers the address that signed it.
///
/// This mirrors what an on-chain verifier does and is intended for clients and tests: the hash
/// is recomputed from `request`, `origin` and the decoded response and expiry. Expiry is not
/// checked against the current time.
pub fn verify_envelope(
    protocol: Protocol,
    request: &[u8],
    data: &[u8],
    origin: Address,
) -> Result<VerifiedResponse, SignerError> {
    match decode_envelope(protocol, data)? {
        Envelope::Raw(response) => Ok(VerifiedResponse { response, expires: None, signer: None }),
        Envelope::Signed { response, expires, signature } => {
            let signature = Signature::from_raw(&signature)?;
            let signer = protocol
                .signing_hash(origin, expires, request, &response)
                .map(|hash| signature.recover_address_from_prehash(&hash))
                .transpose()?;
            Ok(VerifiedResponse { response, expires: Some(expires), signer })
        }
    }
}
