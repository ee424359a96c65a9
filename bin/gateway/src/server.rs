use crate::{GatewayMetrics, OriginResolver};
use alloy_primitives::{Address, Bytes};
use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use ezccip::{EzCcip, EzCcipConfig, Protocol, ReadResponse};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// The body of a CCIP-Read POST request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadRequest {
    /// The contract that reverted with `OffchainLookup`.
    pub sender: String,
    /// The calldata of the lookup.
    pub data: String,
}

#[derive(Debug, Serialize)]
struct ReadReply {
    data: Bytes,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    message: String,
}

/// The CCIP-Read http gateway.
///
/// Every POST, on any path, is a read request. The path only selects the origin, see
/// [`OriginResolver`].
#[derive(Debug)]
pub struct Gateway {
    ezccip: EzCcip,
    config: EzCcipConfig,
    origins: OriginResolver,
    metrics: GatewayMetrics,
}

impl Gateway {
    /// Creates a new [`Gateway`].
    pub fn new(ezccip: EzCcip, config: EzCcipConfig, origins: OriginResolver) -> Self {
        Self { ezccip, config, origins, metrics: GatewayMetrics::default() }
    }

    /// Returns the address responses are signed with.
    pub fn signer(&self) -> Address {
        self.config.signer.address()
    }

    /// Returns the initial protocol of every request.
    pub const fn protocol(&self) -> Protocol {
        self.config.protocol
    }

    /// Returns the router serving the gateway.
    pub fn router(self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);
        Router::new().fallback(handle_request).layer(cors).with_state(Arc::new(self))
    }

    /// Serves the gateway on `listener` until the server fails.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let service = self.router().into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, service).await
    }

    async fn read(&self, ip: String, uri: &Uri, body: &[u8]) -> Result<ReadResponse, Response> {
        let request: ReadRequest = serde_json::from_slice(body)
            .map_err(|err| reply_error(StatusCode::BAD_REQUEST, err.to_string()))?;

        let config = self
            .config
            .clone()
            .with_origin(self.origins.resolve(uri.path()).or(self.config.origin))
            .with_extra("ip", ip)
            .with_extra("url", uri.to_string());
        self.ezccip.handle_read(&request.sender, &request.data, &config).await.map_err(|err| {
            let status =
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let history = err.history().map(ToString::to_string).unwrap_or_default();
            tracing::warn!(target: "ezccip::gateway", %uri, %history, %err, "Read failed");
            reply_error(status, err.to_string())
        })
    }
}

async fn handle_request(
    State(gateway): State<Arc<Gateway>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    if method != Method::POST {
        return reply_error(StatusCode::METHOD_NOT_ALLOWED, "unsupported http method".to_string());
    }

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| peer.ip().to_string(), ToString::to_string);

    let now = Instant::now();
    gateway.metrics.requests.increment(1);
    let response = match gateway.read(ip.clone(), &uri, &body).await {
        Ok(ReadResponse { data, history, .. }) => {
            tracing::info!(target: "ezccip::gateway", "{ip} {uri} {history}");
            (StatusCode::OK, Json(ReadReply { data })).into_response()
        }
        Err(response) => {
            gateway.metrics.failed_requests.increment(1);
            response
        }
    };
    gateway.metrics.request_duration.record(now.elapsed().as_secs_f64());
    response
}

fn reply_error(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorReply { message })).into_response()
}
