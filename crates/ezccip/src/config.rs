use alloy_primitives::Address;
use ezccip_signer::{Protocol, ProtocolSigner};
use std::collections::BTreeMap;

/// The default lifetime of a signed response in seconds.
pub const DEFAULT_TTL_SEC: u64 = 60;

/// The default recursion budget shared by both multicall layers.
pub const DEFAULT_RECURSION_LIMIT: usize = 2;

/// Configuration for [`EzCcip::handle_read`](crate::EzCcip::handle_read).
#[derive(Debug, Clone)]
pub struct EzCcipConfig {
    /// The signer of response envelopes.
    pub signer: ProtocolSigner,
    /// The address responses are signed for. Defaults to the sender.
    pub origin: Option<Address>,
    /// The initial envelope scheme.
    pub protocol: Protocol,
    /// The lifetime of a signed response in seconds.
    pub ttl_sec: u64,
    /// The recursion budget of a request.
    pub recursion_limit: usize,
    /// Free-form fields copied into every [`CallContext`](crate::CallContext).
    pub extra: BTreeMap<String, String>,
}

impl EzCcipConfig {
    /// Creates a new configuration with default values.
    pub fn new(signer: ProtocolSigner) -> Self {
        Self {
            signer,
            origin: None,
            protocol: Protocol::default(),
            ttl_sec: DEFAULT_TTL_SEC,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the origin.
    pub const fn with_origin(mut self, origin: Option<Address>) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the protocol.
    pub const fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets the response lifetime.
    pub const fn with_ttl_sec(mut self, ttl_sec: u64) -> Self {
        self.ttl_sec = ttl_sec;
        self
    }

    /// Sets the recursion budget.
    pub const fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    /// Adds a free-form context field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
