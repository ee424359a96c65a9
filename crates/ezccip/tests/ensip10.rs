//! ENSIP-10 wildcard resolution tests.

use alloy_primitives::{Address, Bytes, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{Revert, SolCall, SolError, SolValue};
use async_trait::async_trait;
use ezccip::{
    ensip10::{IExtendedResolver, IResolverProfiles},
    record_source_fn, BoxError, CallContext, EzCcip, EzCcipConfig, Protocol, ProtocolSigner,
    Record,
};
use ezccip_primitives::{dns_encode, namehash};
use ezccip_signer::verify_envelope;
use std::sync::Arc;

const SENDER: Address = Address::repeat_byte(0x11);

#[derive(Debug)]
struct Demo;

#[async_trait]
impl Record for Demo {
    async fn text(&self, key: &str) -> Result<Option<String>, BoxError> {
        Ok((key == "name").then(|| "demo".to_string()))
    }

    async fn addr(&self, coin_type: U256) -> Result<Option<Bytes>, BoxError> {
        Ok((coin_type == U256::from(60)).then(|| Bytes::from(vec![0x51; 20])))
    }
}

/// Serves [`Demo`] for `test.eth` only.
fn demo_ezccip(multicall: bool) -> eyre::Result<EzCcip> {
    let mut ezccip = EzCcip::new();
    ezccip.enable_ensip10(
        record_source_fn(|name: &str, _: &CallContext| {
            let found = name == "test.eth";
            async move { Ok::<_, BoxError>(found.then(|| Arc::new(Demo) as Arc<dyn Record>)) }
        }),
        multicall,
    )?;
    Ok(ezccip)
}

fn resolve(name: &str, data: impl Into<Bytes>) -> eyre::Result<Bytes> {
    let call = IExtendedResolver::resolveCall { name: dns_encode(name)?, data: data.into() };
    Ok(call.abi_encode().into())
}

fn text(name: &str, key: &str) -> Bytes {
    IResolverProfiles::textCall { node: namehash(name), key: key.to_string() }.abi_encode().into()
}

fn raw_config() -> EzCcipConfig {
    EzCcipConfig::new(ProtocolSigner::new(PrivateKeySigner::random())).with_protocol(Protocol::Raw)
}

#[tokio::test]
async fn can_resolve_text() -> eyre::Result<()> {
    let signer = PrivateKeySigner::random();
    let config = EzCcipConfig::new(ProtocolSigner::new(signer.clone()));
    let ezccip = demo_ezccip(true)?;

    let calldata = resolve("test.eth", text("test.eth", "name"))?;
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &config).await?;

    let verified = verify_envelope(Protocol::Tor, &calldata, &response.data, SENDER)?;
    assert_eq!(verified.signer, Some(signer.address()));
    assert_eq!(String::abi_decode(&verified.response)?, "demo");
    assert_eq!(response.history.to_string(), "resolve(test.eth).text(name)");
    assert_eq!(response.history.record, Some(true));
    assert_eq!(response.history.head().name.as_deref(), Some("text"));

    Ok(())
}

#[tokio::test]
async fn unknown_name_resolves_empty() -> eyre::Result<()> {
    let ezccip = demo_ezccip(true)?;

    let calldata = resolve("other.eth", text("other.eth", "name"))?;
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config()).await?;
    assert_eq!(String::abi_decode(&response.data)?, "");
    assert_eq!(response.history.record, Some(false));

    let addr = IResolverProfiles::addr_0Call { node: namehash("other.eth") }.abi_encode();
    let calldata = resolve("other.eth", addr)?;
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config()).await?;
    assert_eq!(Address::abi_decode(&response.data)?, Address::ZERO);

    Ok(())
}

#[tokio::test]
async fn ccip_multicall_isolates_unknown_selector() -> eyre::Result<()> {
    let ezccip = demo_ezccip(true)?;

    let calls = vec![resolve("test.eth", text("test.eth", "name"))?, Bytes::from(vec![1, 2, 3, 4])];
    let calldata = Bytes::from(IResolverProfiles::multicallCall { calls }.abi_encode());
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config()).await?;

    let results = <(Vec<Bytes>,)>::abi_decode_params(&response.data)?.0;
    assert_eq!(results.len(), 2);
    assert_eq!(String::abi_decode(&results[0])?, "demo");
    assert_eq!(Revert::abi_decode(&results[1])?.reason, "unsupported ccip method: 0x01020304");
    assert_eq!(
        response.history.to_string(),
        "multicall()^2 [resolve(test.eth).text(name) <0x01020304>()<unsupported ccip method: \
         0x01020304>]"
    );

    Ok(())
}

#[tokio::test]
async fn resolve_multicall() -> eyre::Result<()> {
    let ezccip = demo_ezccip(true)?;
    let node = namehash("test.eth");

    let calls = vec![
        text("test.eth", "name"),
        IResolverProfiles::addr_0Call { node }.abi_encode().into(),
        IResolverProfiles::addr_1Call { node, coinType: U256::from(0x8000_0000u64 + 10) }
            .abi_encode()
            .into(),
    ];
    let inner = IResolverProfiles::multicallCall { calls }.abi_encode();
    let calldata = resolve("test.eth", inner)?;
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config()).await?;

    let results = <(Vec<Bytes>,)>::abi_decode_params(&response.data)?.0;
    assert_eq!(String::abi_decode(&results[0])?, "demo");
    assert_eq!(Address::abi_decode(&results[1])?, Address::repeat_byte(0x51));
    assert_eq!(Bytes::abi_decode(&results[2])?, Bytes::new());
    assert_eq!(
        response.history.to_string(),
        "resolve(test.eth).multicall()^3 [text(name) addr() addr(evm:10)]"
    );

    Ok(())
}

#[tokio::test]
async fn resolve_multicall_can_be_disabled() -> eyre::Result<()> {
    let ezccip = demo_ezccip(false)?;

    let inner = IResolverProfiles::multicallCall { calls: vec![text("test.eth", "name")] };
    let calldata = resolve("test.eth", inner.abi_encode())?;
    let err = ezccip
        .handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "unsupported resolve() method: 0xac9650d8");
    assert_eq!(err.status(), 500);

    Ok(())
}

#[tokio::test]
async fn both_multicall_layers_share_budget() -> eyre::Result<()> {
    let ezccip = demo_ezccip(true)?;

    let inner = IResolverProfiles::multicallCall { calls: vec![text("test.eth", "name")] };
    let call = resolve("test.eth", inner.abi_encode())?;
    let multicall = IResolverProfiles::multicallCall { calls: vec![call] };
    let calldata = Bytes::from(multicall.abi_encode());

    let config = raw_config().with_recursion_limit(1);
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &config).await?;
    let results = <(Vec<Bytes>,)>::abi_decode_params(&response.data)?.0;
    assert_eq!(Revert::abi_decode(&results[0])?.reason, "recursion limit");

    let config = raw_config().with_recursion_limit(2);
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &config).await?;
    let results = <(Vec<Bytes>,)>::abi_decode_params(&response.data)?.0;
    let inner = <(Vec<Bytes>,)>::abi_decode_params(&results[0])?.0;
    assert_eq!(String::abi_decode(&inner[0])?, "demo");

    Ok(())
}

#[tokio::test]
async fn record_source_can_change_signing() -> eyre::Result<()> {
    let signer = PrivateKeySigner::random();
    let config = EzCcipConfig::new(ProtocolSigner::new(signer.clone()));
    let origin = Address::repeat_byte(0x99);

    let mut ezccip = EzCcip::new();
    ezccip.enable_ensip10(
        record_source_fn(move |_: &str, context: &CallContext| {
            context.set_protocol(Protocol::Ens);
            context.set_origin(origin);
            async { Ok::<_, BoxError>(Some(Arc::new(Demo) as Arc<dyn Record>)) }
        }),
        true,
    )?;

    let calldata = resolve("test.eth", text("test.eth", "name"))?;
    let response =
        ezccip.handle_read(&SENDER.to_string(), &calldata.to_string(), &config).await?;

    let verified = verify_envelope(Protocol::Ens, &calldata, &response.data, origin)?;
    assert_eq!(verified.signer, Some(signer.address()));
    assert_eq!(String::abi_decode(&verified.response)?, "demo");

    Ok(())
}

#[tokio::test]
async fn record_source_error_fails_request() -> eyre::Result<()> {
    let mut ezccip = EzCcip::new();
    ezccip.enable_ensip10(
        record_source_fn(|_: &str, _: &CallContext| async {
            Err::<Option<Arc<dyn Record>>, BoxError>("lookup failed".into())
        }),
        true,
    )?;

    let calldata = resolve("test.eth", text("test.eth", "name"))?;
    let err = ezccip
        .handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "lookup failed");
    assert_eq!(
        err.history().map(ToString::to_string).as_deref(),
        Some("resolve(test.eth)<lookup failed>")
    );

    Ok(())
}

#[tokio::test]
async fn invalid_dns_name_fails_request() -> eyre::Result<()> {
    let ezccip = demo_ezccip(true)?;

    // truncated final label
    let name = Bytes::from(vec![4, b't', b'e', b's', b't', 3, b'e', b't']);
    let call = IExtendedResolver::resolveCall { name, data: text("test.eth", "name") };
    let calldata = Bytes::from(call.abi_encode());
    let err = ezccip
        .handle_read(&SENDER.to_string(), &calldata.to_string(), &raw_config())
        .await
        .unwrap_err();
    assert_eq!(err.status(), 500);

    Ok(())
}
