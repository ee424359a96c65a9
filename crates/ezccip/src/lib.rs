//! A CCIP-Read (EIP-3668) gateway core with ENSIP-10 wildcard resolution.
//!
//! [`EzCcip`] maps function selectors to [`Handler`]s, dispatches calldata against them,
//! including nested `multicall(bytes[])` batches, and signs the response with one of the
//! [`Protocol`] envelope schemes. [`EzCcip::enable_ensip10`] adds the
//! `resolve(bytes,bytes)` entry point which answers the ENS resolver profile functions from an
//! application-supplied [`Record`].
//!
//! Every request records a [`History`] trace. The trace also carries the recursion budget shared
//! by the multicall of both layers.

mod config;
pub use config::{EzCcipConfig, DEFAULT_RECURSION_LIMIT, DEFAULT_TTL_SEC};

mod context;
pub use context::CallContext;

mod dispatch;
pub use dispatch::{encode_error, MULTICALL};

pub mod ensip10;
pub use ensip10::{process_ensip10, record_source_fn, Pubkey, Record, RecordAbi, RecordSource};

mod error;
pub use error::{BoxError, CallError, ReadError, RegistryError};

mod handler;
pub use handler::{handler_fn, Handler, HandlerCall, HandlerFn, HandlerOutput, RegisteredHandler};

mod history;
pub use history::{History, Show};

mod metrics;
pub use metrics::DispatchMetrics;

mod multicall;

mod read;
pub use read::ReadResponse;

mod registry;
pub use registry::{AbiSource, HandlerKey, HandlerRegistry};

mod value;

pub use ezccip_signer::{Protocol, ProtocolSigner};

use alloy_primitives::Selector;
use std::sync::Arc;

/// The gateway dispatcher.
///
/// Handlers are registered during start-up through `&mut self`; afterwards the instance is only
/// read and can be shared between concurrent requests.
pub struct EzCcip {
    /// The registered handlers, including the built-in multicall.
    registry: HandlerRegistry,
    /// The selector of the built-in multicall, disabled once the recursion budget is spent.
    multicall: Selector,
    /// The dispatcher metrics.
    metrics: DispatchMetrics,
}

impl EzCcip {
    /// Creates a new [`EzCcip`] with the built-in `multicall(bytes[]) returns (bytes[])`.
    ///
    /// Multicall is always registered; a recursion limit of zero disables it.
    pub fn new() -> Self {
        let mut registry = HandlerRegistry::default();
        let multicall = registry
            .register(multicall::MULTICALL_SIGNATURE, Arc::new(multicall::Multicall))
            .expect("valid multicall abi")
            .selector();
        Self { registry, multicall, metrics: DispatchMetrics::default() }
    }

    /// Registers a single implementation for an abi declaring exactly one function.
    pub fn register(
        &mut self,
        abi: impl Into<AbiSource>,
        handler: impl Handler + 'static,
    ) -> Result<Arc<RegisteredHandler>, RegistryError> {
        self.registry.register(abi, Arc::new(handler))
    }

    /// Registers implementations keyed by function name, canonical signature or selector.
    pub fn register_named<K: AsRef<str>>(
        &mut self,
        abi: impl Into<AbiSource>,
        handlers: impl IntoIterator<Item = (K, Arc<dyn Handler>)>,
    ) -> Result<Vec<Arc<RegisteredHandler>>, RegistryError> {
        self.registry.register_named(abi, handlers)
    }

    /// Finds a registered handler by selector, bare name or canonical signature.
    pub fn find_handler(&self, key: impl Into<HandlerKey>) -> Option<&Arc<RegisteredHandler>> {
        self.registry.find(key)
    }

    /// Returns the handler registry.
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }
}

impl Default for EzCcip {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EzCcip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EzCcip").field("registry", &self.registry).finish_non_exhaustive()
    }
}
