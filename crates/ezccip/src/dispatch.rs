use super::{CallContext, CallError, EzCcip, HandlerCall, HandlerOutput, History, Show};
use crate::value::display_value;
use alloy_primitives::{Bytes, Selector};
use alloy_sol_types::{Revert, SolError};

/// The name of the built-in batching function.
pub const MULTICALL: &str = "multicall";

/// Formats an error as a Solidity `Error(string)` revert payload.
pub fn encode_error(err: &CallError) -> Bytes {
    Revert { reason: err.to_string() }.abi_encode().into()
}

/// Returns the selector of the calldata.
pub(crate) fn selector(calldata: &[u8]) -> Result<Selector, CallError> {
    calldata.get(..4).map(Selector::from_slice).ok_or(CallError::ShortCalldata)
}

impl EzCcip {
    /// Dispatches calldata to its registered handler and returns the encoded result.
    ///
    /// The matched handler, arguments and any error are recorded on `history`. Errors are
    /// returned to the caller; only multicall isolates the failures of its elements.
    pub async fn handle_call(
        &self,
        calldata: &[u8],
        context: &CallContext,
        history: &mut History,
    ) -> Result<Bytes, CallError> {
        self.metrics.calls.increment(1);
        history.calldata = Some(Bytes::copy_from_slice(calldata));
        let result = self.dispatch(calldata, context, history).await;
        if let Err(err) = &result {
            self.metrics.failed_calls.increment(1);
            tracing::debug!(target: "ezccip::dispatch", name = ?history.name, %err, "Call failed");
            history.error = Some(err.to_string());
        }
        result
    }

    async fn dispatch(
        &self,
        calldata: &[u8],
        context: &CallContext,
        history: &mut History,
    ) -> Result<Bytes, CallError> {
        let selector = selector(calldata)?;
        let handler = self
            .registry
            .get(&selector)
            .filter(|h| history.level() > 0 || h.selector() != self.multicall)
            .ok_or(CallError::UnsupportedMethod(selector))?
            .clone();
        history.name = Some(handler.name().to_string());

        let args = handler.decode_args(&calldata[4..])?;
        history.show = Show::Args(args.iter().map(display_value).collect());

        let call = HandlerCall { ezccip: self, args, context, history };
        match handler.handler.call(call).await? {
            HandlerOutput::Empty => Ok(Bytes::new()),
            HandlerOutput::Values(values) => handler.encode_output(&values),
            HandlerOutput::Raw(bytes) => Ok(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error() {
        let encoded = encode_error(&CallError::RecursionLimit);
        assert_eq!(&encoded[..4], &[0x08, 0xc3, 0x79, 0xa0]);
        assert_eq!(Revert::abi_decode(&encoded).unwrap().reason, "recursion limit");
    }

    #[test]
    fn test_selector() {
        assert_eq!(selector(&[1, 2, 3, 4, 5]).unwrap(), Selector::from([1, 2, 3, 4]));
        assert!(matches!(selector(&[1, 2, 3]), Err(CallError::ShortCalldata)));
    }
}
