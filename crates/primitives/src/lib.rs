//! Primitive types and wire helpers shared by the ezccip gateway crates.
//!
//! This crate has no knowledge of handlers or signing. It holds the pieces of the CCIP-Read and
//! ENSIP-10 wire formats that every layer needs: DNS-encoded names, namehashes, hex arguments
//! and the log-safe renderings used by request traces.

mod ascii;
pub use ascii::asciiize;

mod display;
pub use display::{
    abi_content_types, coin_type, AbiContentType, DEFAULT_COIN_TYPE, EVM_COIN_TYPE_MSB,
};

mod dns;
pub use dns::{dns_encode, labels_from_dns_encoded, name_from_dns_encoded};

mod error;
pub use error::PrimitivesError;

mod hex;
pub use hex::{is_hex, parse_hex_arg};

mod namehash;
pub use namehash::namehash;
