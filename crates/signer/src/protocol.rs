use super::SignerError;
use alloy_primitives::{keccak256, Address, B256};
use std::{fmt, str::FromStr};

/// The response envelope scheme used to sign a CCIP-Read answer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// The response payload is returned unsigned.
    Raw,
    /// `abi.encode(bytes response, uint64 expires, bytes signature)` over an EIP-191 version 0
    /// hash, as used by the ENS offchain-resolver gateway.
    Ens,
    /// `abi.encode(bytes signature, uint64 expires, bytes response)`, as used by
    /// TheOffchainResolver.
    #[default]
    Tor,
}

impl Protocol {
    /// All supported protocols.
    pub const ALL: [Self; 3] = [Self::Raw, Self::Ens, Self::Tor];

    /// Returns the name of the protocol.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Ens => "ens",
            Self::Tor => "tor",
        }
    }

    /// Computes the hash that is signed for a request/response pair, or `None` for
    /// [`Protocol::Raw`].
    pub fn signing_hash(
        &self,
        origin: Address,
        expires: u64,
        request: &[u8],
        response: &[u8],
    ) -> Option<B256> {
        let prefix: &[u8] = match self {
            Self::Raw => return None,
            Self::Ens => &[0x19, 0x00],
            Self::Tor => &[],
        };
        let mut buf = Vec::with_capacity(prefix.len() + 20 + 8 + 32 + 32);
        buf.extend_from_slice(prefix);
        buf.extend_from_slice(origin.as_slice());
        buf.extend_from_slice(&expires.to_be_bytes());
        buf.extend_from_slice(keccak256(request).as_slice());
        buf.extend_from_slice(keccak256(response).as_slice());
        Some(keccak256(buf))
    }
}

impl FromStr for Protocol {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SignerError::UnknownProtocol(s.to_string()))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
