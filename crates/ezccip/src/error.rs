use super::History;
use alloy_primitives::Selector;
use ezccip_primitives::PrimitivesError;
use ezccip_signer::SignerError;

/// A boxed error returned by application-supplied handlers, records and record sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error that can occur while registering handlers.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A function signature could not be parsed.
    #[error("invalid abi: {0}")]
    InvalidAbi(#[from] alloy_json_abi::parser::Error),
    /// A single implementation was provided for an abi that does not declare exactly one
    /// function.
    #[error("expected 1 implementation, abi declares {0} functions")]
    ExpectedSingleFunction(usize),
    /// A named implementation does not match any function of the abi.
    #[error("expected interface function: {0}")]
    UnknownFunction(String),
}

/// An error that can occur while dispatching a call.
///
/// The [`Display`](std::fmt::Display) output of this error is the reason carried by the
/// `Error(string)` payload substituted for a failed multicall element.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The calldata is shorter than a selector.
    #[error("expected calldata")]
    ShortCalldata,
    /// No handler is registered for the selector, or multicall is disabled at this depth.
    #[error("unsupported ccip method: {0}")]
    UnsupportedMethod(Selector),
    /// The selector is not an ENSIP-10 profile function, or multicall is disabled.
    #[error("unsupported resolve() method: {0}")]
    UnsupportedResolveMethod(Selector),
    /// The history has no recursion budget left.
    #[error("recursion limit")]
    RecursionLimit,
    /// The arguments do not have the shape the handler expects.
    #[error("unexpected arguments: expected {0}")]
    UnexpectedArguments(&'static str),
    /// Dynamic abi encoding or decoding failed.
    #[error(transparent)]
    Abi(#[from] alloy_dyn_abi::Error),
    /// Static abi encoding or decoding failed.
    #[error(transparent)]
    SolAbi(#[from] alloy_sol_types::Error),
    /// The name passed to `resolve()` is not a valid DNS-encoded name.
    #[error(transparent)]
    Name(#[from] PrimitivesError),
    /// An application-supplied handler or record failed.
    #[error(transparent)]
    Handler(BoxError),
}

impl CallError {
    /// Wraps an application error.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }
}

/// An error returned by [`EzCcip::handle_read`](crate::EzCcip::handle_read).
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The sender is not a 20 byte hex address.
    #[error("expected sender address")]
    InvalidSender,
    /// The calldata is not an even-length hex string holding at least a selector.
    #[error("expected calldata")]
    InvalidCalldata,
    /// The dispatch failed. The history shows where.
    #[error("{error}")]
    Dispatch {
        /// The error that aborted the request.
        error: CallError,
        /// The trace of the failed request.
        history: Box<History>,
    },
    /// The response could not be signed.
    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl ReadError {
    /// Returns the HTTP status code that classifies this error.
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidSender | Self::InvalidCalldata => 400,
            Self::Dispatch { .. } | Self::Signer(_) => 500,
        }
    }

    /// Returns the history of the failed request, if dispatch started.
    pub fn history(&self) -> Option<&History> {
        match self {
            Self::Dispatch { history, .. } => Some(history),
            _ => None,
        }
    }
}
