use super::{BoxError, CallContext, CallError, EzCcip, History};
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Bytes, Selector};
use async_trait::async_trait;
use std::{fmt, future::Future, sync::Arc};

/// The value returned by a [`Handler`].
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// The empty byte string.
    Empty,
    /// Values encoded against the declared return types of the function.
    Values(Vec<DynSolValue>),
    /// Already encoded bytes, returned as is.
    Raw(Bytes),
}

impl From<Vec<DynSolValue>> for HandlerOutput {
    fn from(values: Vec<DynSolValue>) -> Self {
        Self::Values(values)
    }
}

impl From<Bytes> for HandlerOutput {
    fn from(bytes: Bytes) -> Self {
        Self::Raw(bytes)
    }
}

/// A single invocation of a [`Handler`].
#[derive(Debug)]
pub struct HandlerCall<'a> {
    /// The dispatcher the handler is registered on, for recursive calls.
    pub ezccip: &'a EzCcip,
    /// The decoded arguments.
    pub args: Vec<DynSolValue>,
    /// The request context.
    pub context: &'a CallContext,
    /// The trace node of this call.
    pub history: &'a mut History,
}

/// The implementation of a registered function.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles a decoded call.
    async fn call(&self, call: HandlerCall<'_>) -> Result<HandlerOutput, CallError>;
}

/// A [`Handler`] built from a closure, see [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F>(F);

/// Creates a [`Handler`] from an async closure taking the decoded arguments and the context.
///
/// ```ignore
/// ezccip.register(
///     "f(uint256 a, uint256 b) returns (uint256)",
///     handler_fn(|args, _| async move { ... }),
/// )?;
/// ```
pub const fn handler_fn<F, Fut, E>(f: F) -> HandlerFn<F>
where
    F: Fn(Vec<DynSolValue>, &CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HandlerOutput, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut, E> Handler for HandlerFn<F>
where
    F: Fn(Vec<DynSolValue>, &CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HandlerOutput, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn call(&self, call: HandlerCall<'_>) -> Result<HandlerOutput, CallError> {
        (self.0)(call.args, call.context).await.map_err(CallError::handler)
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// A function fragment bound to its implementation.
#[derive(Clone)]
pub struct RegisteredHandler {
    /// The function fragment.
    pub function: Function,
    /// The implementation.
    pub handler: Arc<dyn Handler>,
}

impl RegisteredHandler {
    /// Returns the selector of the function.
    pub fn selector(&self) -> Selector {
        self.function.selector()
    }

    /// Returns the name of the function.
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Returns the canonical signature of the function, e.g. `f(uint256,uint256)`.
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    /// Encodes a call to the function, including the selector.
    pub fn encode_call(&self, args: &[DynSolValue]) -> Result<Bytes, CallError> {
        Ok(self.function.abi_encode_input(args)?.into())
    }

    /// Decodes the arguments of a call, excluding the selector.
    pub fn decode_args(&self, data: &[u8]) -> Result<Vec<DynSolValue>, CallError> {
        Ok(self.function.abi_decode_input(data)?)
    }

    /// Encodes values against the declared return types.
    pub fn encode_output(&self, values: &[DynSolValue]) -> Result<Bytes, CallError> {
        Ok(self.function.abi_encode_output(values)?.into())
    }

    /// Decodes a response against the declared return types.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<DynSolValue>, CallError> {
        Ok(self.function.abi_decode_output(data)?)
    }
}

impl fmt::Debug for RegisteredHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredHandler")
            .field("function", &self.function.full_signature())
            .field("selector", &self.selector())
            .finish()
    }
}
