use alloy_primitives::U256;
use std::fmt;

/// The SLIP-44 coin type of Ethereum mainnet, used by the single-argument `addr(node)`.
pub const DEFAULT_COIN_TYPE: u64 = 60;

/// ENSIP-11 coin types at or above this value encode an EVM chain id.
pub const EVM_COIN_TYPE_MSB: u64 = 0x8000_0000;

/// Renders a coin type for logs: ENSIP-11 EVM coin types become `evm:<chain id>`.
pub fn coin_type(coin_type: U256) -> String {
    let msb = U256::from(EVM_COIN_TYPE_MSB);
    if coin_type >= msb {
        format!("evm:{}", coin_type - msb)
    } else {
        coin_type.to_string()
    }
}

/// A content type bit of the ENSIP-4 `ABI(node, contentTypes)` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiContentType {
    /// Plain JSON.
    Json = 1,
    /// zlib-compressed JSON.
    ZipJson = 2,
    /// CBOR.
    Cbor = 4,
    /// A URI pointing at the ABI.
    Uri = 8,
}

impl AbiContentType {
    /// All content types in bit order.
    pub const ALL: [Self; 4] = [Self::Json, Self::ZipJson, Self::Cbor, Self::Uri];

    /// Returns the bit of the content type.
    pub const fn bit(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for AbiContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::ZipJson => write!(f, "zip(JSON)"),
            Self::Cbor => write!(f, "CBOR"),
            Self::Uri => write!(f, "URI"),
        }
    }
}

/// Renders an ENSIP-4 content type bitmask as `|`-joined labels, e.g. `JSON|CBOR`.
pub fn abi_content_types(types: U256) -> String {
    let bits = types.as_limbs()[0];
    AbiContentType::ALL
        .iter()
        .filter(|t| bits & t.bit() != 0)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_type() {
        assert_eq!(coin_type(U256::from(60)), "60");
        assert_eq!(coin_type(U256::from(EVM_COIN_TYPE_MSB)), "evm:0");
        assert_eq!(coin_type(U256::from(EVM_COIN_TYPE_MSB + 8453)), "evm:8453");
    }

    #[test]
    fn test_abi_content_types() {
        assert_eq!(abi_content_types(U256::from(1)), "JSON");
        assert_eq!(abi_content_types(U256::from(5)), "JSON|CBOR");
        assert_eq!(abi_content_types(U256::from(15)), "JSON|zip(JSON)|CBOR|URI");
        assert_eq!(abi_content_types(U256::ZERO), "");
    }
}
