use super::PrimitivesError;
use alloy_primitives::{hex, Bytes};

/// Returns true if `s` is an even-length, 0x-prefixed hex string of any case.
pub fn is_hex(s: &str) -> bool {
    s.len() % 2 == 0 &&
        s.strip_prefix("0x").is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Parses a 0x-prefixed hex argument into bytes.
pub fn parse_hex_arg(s: &str) -> Result<Bytes, PrimitivesError> {
    if !is_hex(s) {
        return Err(PrimitivesError::InvalidHex);
    }
    hex::decode(&s[2..]).map(Into::into).map_err(|_| PrimitivesError::InvalidHex)
}
