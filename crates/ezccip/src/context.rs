use alloy_primitives::{Address, Bytes};
use ezccip_signer::Protocol;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// The per-request context shared by reference with every handler of the call tree.
///
/// `origin` and `protocol` are mutable: a record source may change them while resolving a name,
/// e.g. to sign with a different scheme depending on which resolver is calling. The values read
/// after dispatch completes are the ones used to sign the response.
#[derive(Debug)]
pub struct CallContext {
    /// The address that triggered the offchain lookup.
    sender: Address,
    /// The top-level request calldata.
    calldata: Bytes,
    /// The address the response is signed for.
    origin: RwLock<Address>,
    /// The envelope scheme of the response.
    protocol: RwLock<Protocol>,
    /// Free-form fields supplied by the transport, e.g. the client ip.
    extra: BTreeMap<String, String>,
}

impl CallContext {
    /// Creates a new [`CallContext`].
    pub fn new(
        sender: Address,
        calldata: Bytes,
        origin: Address,
        protocol: Protocol,
        extra: BTreeMap<String, String>,
    ) -> Self {
        Self {
            sender,
            calldata,
            origin: RwLock::new(origin),
            protocol: RwLock::new(protocol),
            extra,
        }
    }

    /// Returns the sender of the request.
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Returns the top-level request calldata.
    pub const fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    /// Returns the current origin.
    pub fn origin(&self) -> Address {
        *self.origin.read()
    }

    /// Replaces the origin the response will be signed for.
    pub fn set_origin(&self, origin: Address) {
        *self.origin.write() = origin;
    }

    /// Returns the current protocol.
    pub fn protocol(&self) -> Protocol {
        *self.protocol.read()
    }

    /// Replaces the protocol the response will be signed with.
    pub fn set_protocol(&self, protocol: Protocol) {
        *self.protocol.write() = protocol;
    }

    /// Returns a transport supplied field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// Returns all transport supplied fields.
    pub const fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}
