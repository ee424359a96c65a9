use super::{CallContext, EzCcip, EzCcipConfig, History, ReadError};
use alloy_primitives::{Address, Bytes};
use ezccip_primitives::{is_hex, parse_hex_arg};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// The answer to a CCIP-Read request.
#[derive(Debug, Clone)]
pub struct ReadResponse {
    /// The response envelope.
    pub data: Bytes,
    /// The call trace of the request.
    pub history: History,
    /// The expiry bound into the envelope, in unix seconds.
    pub expires: u64,
}

impl EzCcip {
    /// Handles an EIP-3668 request: dispatches `calldata` and signs the response for the origin.
    ///
    /// `sender` must be a 20 byte hex address and `calldata` a hex string holding at least a
    /// selector; otherwise a client error is returned before anything is dispatched. The origin
    /// and protocol are read from the [`CallContext`] after dispatch, so a record source may
    /// change them.
    pub async fn handle_read(
        &self,
        sender: &str,
        calldata: &str,
        config: &EzCcipConfig,
    ) -> Result<ReadResponse, ReadError> {
        if !is_hex(sender) || sender.len() != 42 {
            return Err(ReadError::InvalidSender);
        }
        if !is_hex(calldata) || calldata.len() < 10 {
            return Err(ReadError::InvalidCalldata);
        }
        let sender: Address = sender.parse().map_err(|_| ReadError::InvalidSender)?;
        let calldata =
            parse_hex_arg(&calldata.to_ascii_lowercase()).map_err(|_| ReadError::InvalidCalldata)?;

        let now = Instant::now();
        let context = CallContext::new(
            sender,
            calldata.clone(),
            config.origin.unwrap_or(sender),
            config.protocol,
            config.extra.clone(),
        );
        let mut history = History::new(config.recursion_limit);
        let response = match self.handle_call(&calldata, &context, &mut history).await {
            Ok(response) => response,
            Err(error) => return Err(ReadError::Dispatch { error, history: Box::new(history) }),
        };

        let expires = unix_now().saturating_add(config.ttl_sec);
        let protocol = context.protocol();
        let data =
            config.signer.sign(protocol, context.origin(), expires, &calldata, response).await?;
        self.metrics.read_duration.record(now.elapsed().as_secs_f64());

        tracing::trace!(
            target: "ezccip::dispatch",
            %sender,
            %protocol,
            origin = %context.origin(),
            %history,
            "Handled read"
        );
        Ok(ReadResponse { data, history, expires })
    }
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::{EzCcip, EzCcipConfig, ProtocolSigner, ReadError};
    use alloy_signer_local::PrivateKeySigner;

    fn config() -> EzCcipConfig {
        EzCcipConfig::new(ProtocolSigner::new(PrivateKeySigner::random()))
    }

    #[tokio::test]
    async fn test_rejects_malformed_sender() {
        let ezccip = EzCcip::new();
        for sender in ["", "0x1234", "0xzz00000000000000000000000000000000000000", "deadbeef"] {
            let err = ezccip.handle_read(sender, "0x12345678", &config()).await.unwrap_err();
            assert!(matches!(err, ReadError::InvalidSender));
            assert_eq!(err.status(), 400);
        }
    }

    #[tokio::test]
    async fn test_rejects_malformed_calldata() {
        let ezccip = EzCcip::new();
        let sender = "0x0000000000000000000000000000000000000001";
        for calldata in ["0x", "0x123456", "0x123456789", "12345678"] {
            let err = ezccip.handle_read(sender, calldata, &config()).await.unwrap_err();
            assert!(matches!(err, ReadError::InvalidCalldata));
            assert_eq!(err.status(), 400);
        }
    }

    #[tokio::test]
    async fn test_unknown_selector_is_a_server_error() {
        let ezccip = EzCcip::new();
        let sender = "0x0000000000000000000000000000000000000001";
        let err = ezccip.handle_read(sender, "0xDEADBEEF", &config()).await.unwrap_err();
        assert_eq!(err.to_string(), "unsupported ccip method: 0xdeadbeef");
        assert_eq!(err.status(), 500);
        assert_eq!(
            err.history().unwrap().to_string(),
            "<0xdeadbeef>()<unsupported ccip method: 0xdeadbeef>"
        );
    }
}
