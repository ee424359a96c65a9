//! The ezccip gateway binary.

use clap::Parser;
use ezccip_gateway::GatewayArgs;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(GatewayArgs::parse()).await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

async fn run(args: GatewayArgs) -> eyre::Result<()> {
    args.validate().map_err(|err| eyre::eyre!(err))?;
    let gateway = args.gateway()?;

    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port))).await?;
    let endpoint = format!("http://localhost:{}", listener.local_addr()?.port());
    tracing::info!(
        target: "ezccip::gateway",
        "Serving {:?} {} {}",
        gateway.protocol().as_str(),
        gateway.signer(),
        endpoint
    );

    gateway.serve(listener).await?;
    Ok(())
}
