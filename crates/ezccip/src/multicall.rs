use super::{encode_error, CallError, Handler, HandlerCall, HandlerOutput, Show};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Bytes;
use async_trait::async_trait;
use futures::future::join_all;

/// The signature of the built-in multicall.
pub(crate) const MULTICALL_SIGNATURE: &str = "multicall(bytes[] calls) returns (bytes[])";

/// Dispatches every inner call concurrently and returns the results in input order.
///
/// A failing element is replaced by its `Error(string)` payload. Running out of recursion budget
/// while entering the elements fails the whole batch.
#[derive(Debug)]
pub(crate) struct Multicall;

#[async_trait]
impl Handler for Multicall {
    async fn call(&self, call: HandlerCall<'_>) -> Result<HandlerOutput, CallError> {
        let HandlerCall { ezccip, args, context, history } = call;
        history.show = Show::Suppressed;

        let calls = bytes_array(args.first())?;
        let children = history.enter_many(calls.len())?;
        let results = join_all(calls.iter().zip(children.iter_mut()).map(
            |(data, child)| async move {
                ezccip
                    .handle_call(data, context, child)
                    .await
                    .unwrap_or_else(|err| encode_error(&err))
            },
        ))
        .await;

        let results = results.into_iter().map(|b| DynSolValue::Bytes(b.into())).collect();
        Ok(HandlerOutput::Values(vec![DynSolValue::Array(results)]))
    }
}

/// Extracts a `bytes[]` argument.
pub(crate) fn bytes_array(value: Option<&DynSolValue>) -> Result<Vec<Bytes>, CallError> {
    value
        .and_then(DynSolValue::as_array)
        .ok_or(CallError::UnexpectedArguments("bytes[]"))?
        .iter()
        .map(|v| v.as_bytes().map(Bytes::copy_from_slice))
        .collect::<Option<Vec<_>>>()
        .ok_or(CallError::UnexpectedArguments("bytes[]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_array() {
        let value =
            DynSolValue::Array(vec![DynSolValue::Bytes(vec![1]), DynSolValue::Bytes(vec![])]);
        assert_eq!(
            bytes_array(Some(&value)).unwrap(),
            vec![Bytes::from(vec![1u8]), Bytes::new()]
        );
        assert!(bytes_array(None).is_err());
        assert!(bytes_array(Some(&DynSolValue::Bool(true))).is_err());
    }
}
