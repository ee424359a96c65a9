//! ENSIP-10 wildcard resolution.
//!
//! [`EzCcip::enable_ensip10`] registers `resolve(bytes name, bytes data)`. The name is looked up
//! through a [`RecordSource`] and the inner calldata is answered from the returned [`Record`] by
//! [`process_ensip10`], a second dispatcher over the fixed resolver profile abi.

mod abi;
pub use abi::{IExtendedResolver, IResolverProfiles};
use abi::RESOLVE_SIGNATURE;

mod record;
pub use record::{record_source_fn, Pubkey, Record, RecordAbi, RecordSource, RecordSourceFn};

use crate::{
    dispatch::selector, encode_error, CallError, EzCcip, Handler, HandlerCall, HandlerOutput,
    History, RegisteredHandler, RegistryError, Show, MULTICALL,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolInterface, SolValue};
use async_trait::async_trait;
use ezccip_primitives::{
    abi_content_types, asciiize, coin_type, name_from_dns_encoded, DEFAULT_COIN_TYPE,
};
use futures::{
    future::{join_all, BoxFuture},
    FutureExt,
};
use std::sync::Arc;
use IResolverProfiles::IResolverProfilesCalls;

/// Answers every profile query with its empty value.
struct EmptyRecord;

impl Record for EmptyRecord {}

/// Answers a resolver profile call from `record`.
///
/// A missing record, and a record without the queried capability, both produce the empty value
/// of the function. `multicall(bytes[])` is rejected unless `multicall` is set; nested multicalls
/// are always allowed and bounded only by the recursion budget of `history`.
pub fn process_ensip10<'a>(
    record: Option<&'a dyn Record>,
    calldata: &'a [u8],
    multicall: bool,
    history: &'a mut History,
) -> BoxFuture<'a, Result<Bytes, CallError>> {
    async move {
        history.calldata = Some(Bytes::copy_from_slice(calldata));
        let record = record.unwrap_or(&EmptyRecord);
        let result = dispatch_profile(record, calldata, multicall, history).await;
        if let Err(err) = &result {
            tracing::debug!(
                target: "ezccip::ensip10",
                name = ?history.name,
                %err,
                "Profile call failed"
            );
            history.error = Some(err.to_string());
        }
        result
    }
    .boxed()
}

async fn dispatch_profile(
    record: &dyn Record,
    calldata: &[u8],
    multicall: bool,
    history: &mut History,
) -> Result<Bytes, CallError> {
    let selector = selector(calldata)?;
    if !IResolverProfilesCalls::valid_selector(selector.0) ||
        (!multicall && selector.0 == IResolverProfiles::multicallCall::SELECTOR)
    {
        return Err(CallError::UnsupportedResolveMethod(selector));
    }

    // the node argument is never shown
    let encoded = match IResolverProfilesCalls::abi_decode(calldata)? {
        IResolverProfilesCalls::multicall(call) => {
            history.name = Some(MULTICALL.to_string());
            history.show = Show::Suppressed;
            let children = history.enter_many(call.calls.len())?;
            let results = join_all(call.calls.iter().zip(children.iter_mut()).map(
                |(data, child)| async move {
                    process_ensip10(Some(record), data, true, child)
                        .await
                        .unwrap_or_else(|err| encode_error(&err))
                },
            ))
            .await;
            (results,).abi_encode_params()
        }
        IResolverProfilesCalls::addr_0(_) => {
            enter_profile(history, "addr", Vec::new());
            let default = U256::from(DEFAULT_COIN_TYPE);
            let value = record.addr(default).await.map_err(CallError::Handler)?;
            (evm_address(value.as_ref().map_or(&[][..], |v| &v[..])),).abi_encode_params()
        }
        IResolverProfilesCalls::addr_1(call) => {
            enter_profile(history, "addr", vec![coin_type(call.coinType)]);
            let value = record.addr(call.coinType).await.map_err(CallError::Handler)?;
            (value.unwrap_or_default(),).abi_encode_params()
        }
        IResolverProfilesCalls::text(call) => {
            enter_profile(history, "text", vec![asciiize(&call.key)]);
            let value = record.text(&call.key).await.map_err(CallError::Handler)?;
            (value.unwrap_or_default(),).abi_encode_params()
        }
        IResolverProfilesCalls::contenthash(_) => {
            enter_profile(history, "contenthash", Vec::new());
            let value = record.contenthash().await.map_err(CallError::Handler)?;
            (value.unwrap_or_default(),).abi_encode_params()
        }
        IResolverProfilesCalls::name(_) => {
            enter_profile(history, "name", Vec::new());
            let value = record.name().await.map_err(CallError::Handler)?;
            (value.unwrap_or_default(),).abi_encode_params()
        }
        IResolverProfilesCalls::pubkey(_) => {
            enter_profile(history, "pubkey", Vec::new());
            match record.pubkey().await.map_err(CallError::Handler)? {
                Some(Pubkey::Raw(raw)) => return Ok(raw),
                Some(Pubkey::Coordinates { x, y }) => (x, y).abi_encode_params(),
                None => (U256::ZERO, U256::ZERO).abi_encode_params(),
            }
        }
        IResolverProfilesCalls::ABI(call) => {
            enter_profile(history, "ABI", vec![abi_content_types(call.contentTypes)]);
            match record.abi(call.contentTypes).await.map_err(CallError::Handler)? {
                Some(RecordAbi::Raw(raw)) => return Ok(raw),
                Some(RecordAbi::Typed { content_type, data }) => {
                    (content_type, data).abi_encode_params()
                }
                None => (U256::ZERO, Bytes::new()).abi_encode_params(),
            }
        }
    };
    Ok(encoded.into())
}

fn enter_profile(history: &mut History, name: &str, show: Vec<String>) {
    history.name = Some(name.to_string());
    history.show = Show::Args(show);
}

/// Shapes an `addr(node)` value into an address: the first 20 bytes, left-padded with zeros.
fn evm_address(value: &[u8]) -> Address {
    let value = &value[..value.len().min(20)];
    let mut address = [0u8; 20];
    address[20 - value.len()..].copy_from_slice(value);
    Address::from(address)
}

/// The `resolve(bytes,bytes)` handler.
struct Resolve<S> {
    source: S,
    multicall: bool,
}

#[async_trait]
impl<S: RecordSource> Handler for Resolve<S> {
    async fn call(&self, call: HandlerCall<'_>) -> Result<HandlerOutput, CallError> {
        let HandlerCall { args, context, history, .. } = call;
        let [DynSolValue::Bytes(dns_name), DynSolValue::Bytes(data)] = args.as_slice() else {
            return Err(CallError::UnexpectedArguments("(bytes,bytes)"));
        };

        // not normalized
        let name = name_from_dns_encoded(dns_name)?;
        history.show = Show::Args(vec![asciiize(&name)]);

        let record = self.source.record(&name, context).await.map_err(CallError::Handler)?;
        history.record = Some(record.is_some());

        let response =
            process_ensip10(record.as_deref(), data, self.multicall, history.then()).await?;
        Ok(HandlerOutput::Raw(response))
    }
}

impl EzCcip {
    /// Registers the ENSIP-10 `resolve(bytes name, bytes data) returns (bytes)` entry point.
    ///
    /// `source` maps the decoded name to a [`Record`]; `multicall` enables the profile level
    /// `multicall(bytes[])` of the inner calldata.
    pub fn enable_ensip10(
        &mut self,
        source: impl RecordSource + 'static,
        multicall: bool,
    ) -> Result<Arc<RegisteredHandler>, RegistryError> {
        self.register(RESOLVE_SIGNATURE, Resolve { source, multicall })
    }
}
