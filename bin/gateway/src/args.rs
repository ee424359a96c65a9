use crate::{
    constants::{DEFAULT_PORT, DEFAULT_SIGNING_KEY_SEED},
    Gateway, OriginResolver, StaticRecords,
};
use alloy_primitives::{hex, keccak256, Address, B256};
use alloy_signer_local::PrivateKeySigner;
use ezccip::{
    EzCcip, EzCcipConfig, Protocol, ProtocolSigner, DEFAULT_RECURSION_LIMIT, DEFAULT_TTL_SEC,
};
use std::{fs, path::PathBuf};

/// The arguments of the gateway.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "ezccip-gateway", version, about = "A CCIP-Read gateway with ENSIP-10 resolution")]
pub struct GatewayArgs {
    /// The port to listen on.
    #[arg(long, env = "EZCCIP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// The response envelope scheme: raw, ens or tor.
    #[arg(long, env = "EZCCIP_PROTOCOL", default_value_t = Protocol::Tor)]
    pub protocol: Protocol,
    /// The signer arguments.
    #[command(flatten)]
    pub signer_args: SignerArgs,
    /// The origin responses are signed for when the path does not select one.
    #[arg(long, env = "EZCCIP_ORIGIN", value_name = "ADDRESS")]
    pub origin: Option<Address>,
    /// Path keys mapped to origins, e.g. `s=0x...`. The key `*` matches every path.
    #[arg(
        long = "resolver",
        env = "EZCCIP_RESOLVERS",
        value_name = "KEY=ADDRESS",
        value_delimiter = ',',
        value_parser = parse_resolver
    )]
    pub resolvers: Vec<(String, Address)>,
    /// The lifetime of a signed response in seconds.
    #[arg(long, env = "EZCCIP_TTL", default_value_t = DEFAULT_TTL_SEC)]
    pub ttl: u64,
    /// The recursion budget shared by both multicall layers.
    #[arg(
        long = "recursion-limit",
        env = "EZCCIP_RECURSION_LIMIT",
        default_value_t = DEFAULT_RECURSION_LIMIT
    )]
    pub recursion_limit: usize,
    /// A JSON file of static records served through ENSIP-10.
    #[arg(long, env = "EZCCIP_RECORDS", value_name = "FILE_PATH")]
    pub records: Option<PathBuf>,
    /// Disables `multicall(bytes[])` inside `resolve()` calldata.
    #[arg(long = "no-multicall", env = "EZCCIP_NO_MULTICALL")]
    pub no_multicall: bool,
}

impl GatewayArgs {
    /// Validates the arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl == 0 {
            return Err("ttl must be positive".to_string());
        }
        for (i, (key, _)) in self.resolvers.iter().enumerate() {
            if self.resolvers[..i].iter().any(|(other, _)| other == key) {
                return Err(format!("duplicate resolver key: {key}"));
            }
        }
        Ok(())
    }

    /// Builds the gateway described by the arguments.
    pub fn gateway(&self) -> eyre::Result<Gateway> {
        let records = match &self.records {
            Some(path) => StaticRecords::load(path)?,
            None => StaticRecords::default(),
        };
        tracing::info!(target: "ezccip::gateway", records = records.len(), "Loaded records");

        let mut ezccip = EzCcip::new();
        ezccip.enable_ensip10(records, !self.no_multicall)?;

        let config = EzCcipConfig::new(ProtocolSigner::new(self.signer_args.signer()?))
            .with_protocol(self.protocol)
            .with_ttl_sec(self.ttl)
            .with_recursion_limit(self.recursion_limit);
        let origins = self
            .resolvers
            .iter()
            .fold(OriginResolver::new(self.origin), |origins, (key, origin)| {
                origins.with_resolver(key.clone(), *origin)
            });
        Ok(Gateway::new(ezccip, config, origins))
    }
}

fn parse_resolver(s: &str) -> Result<(String, Address), String> {
    let (key, address) = s.split_once('=').ok_or_else(|| format!("expected KEY=ADDRESS: {s}"))?;
    let address = address.parse().map_err(|err| format!("invalid resolver address: {err}"))?;
    Ok((key.trim_start_matches('/').to_string(), address))
}

/// The arguments for the response signer.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SignerArgs {
    /// Path to the file containing the signer's private key
    #[arg(
        long = "signer.key-file",
        env = "EZCCIP_SIGNER_KEY_FILE",
        value_name = "FILE_PATH",
        conflicts_with = "private_key",
        help = "Path to the hex-encoded private key file for the signer (optional 0x prefix). Mutually exclusive with --signer.private-key"
    )]
    pub key_file: Option<PathBuf>,

    /// The hex-encoded private key of the signer.
    #[arg(long = "signer.private-key", env = "EZCCIP_SIGNER_PRIVATE_KEY", value_name = "HEX")]
    pub private_key: Option<B256>,
}

impl SignerArgs {
    /// Create a signer based on the configured arguments
    ///
    /// Without a key the signer is derived from `keccak256("ezccip")`, which is public.
    pub fn signer(&self) -> eyre::Result<PrivateKeySigner> {
        let signer = if let Some(key_file_path) = &self.key_file {
            // Load the private key from the file
            let key_content = fs::read_to_string(key_file_path)
                .map_err(|e| {
                    eyre::eyre!("Failed to read signer key file {}: {}", key_file_path.display(), e)
                })?
                .trim()
                .to_string();

            let hex_str = key_content.strip_prefix("0x").unwrap_or(&key_content);
            let key_bytes = hex::decode(hex_str).map_err(|e| {
                eyre::eyre!(
                    "Failed to decode hex private key from file {}: {}",
                    key_file_path.display(),
                    e
                )
            })?;

            PrivateKeySigner::from_slice(&key_bytes)
                .map_err(|e| eyre::eyre!("Failed to create signer from key file: {}", e))?
        } else if let Some(private_key) = &self.private_key {
            PrivateKeySigner::from_bytes(private_key)
                .map_err(|e| eyre::eyre!("Failed to create signer from private key: {}", e))?
        } else {
            tracing::warn!(
                target: "ezccip::gateway",
                "No signer key configured, using the public default key"
            );
            default_signer()?
        };

        tracing::info!(target: "ezccip::gateway",
            "Created private key signer with address: {}",
            signer.address()
        );
        Ok(signer)
    }
}

/// Returns the signer derived from the public default key.
pub fn default_signer() -> eyre::Result<PrivateKeySigner> {
    PrivateKeySigner::from_bytes(&keccak256(DEFAULT_SIGNING_KEY_SEED))
        .map_err(|e| eyre::eyre!("Failed to create default signer: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_resolver() {
        let address = Address::repeat_byte(1);
        assert_eq!(parse_resolver(&format!("s={address}")), Ok(("s".to_string(), address)));
        assert_eq!(parse_resolver(&format!("/*={address}")), Ok(("*".to_string(), address)));
        assert!(parse_resolver("s").is_err());
        assert!(parse_resolver("s=0x12").is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = GatewayArgs::try_parse_from([
            "ezccip-gateway",
            "--port",
            "9000",
            "--protocol",
            "ens",
            "--resolver",
            "s=0x0000000000000000000000000000000000000001",
            "--resolver",
            "g=0x0000000000000000000000000000000000000002",
            "--no-multicall",
        ])
        .unwrap();
        assert_eq!(args.port, 9000);
        assert_eq!(args.protocol, Protocol::Ens);
        assert_eq!(args.resolvers.len(), 2);
        assert!(args.no_multicall);
        assert_eq!(args.validate(), Ok(()));
    }

    #[test]
    fn test_signer_sources_conflict() {
        let key = B256::repeat_byte(1).to_string();
        let result = GatewayArgs::try_parse_from([
            "ezccip-gateway",
            "--signer.key-file",
            "key.txt",
            "--signer.private-key",
            key.as_str(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_signer() {
        let signer = SignerArgs::default().signer().unwrap();
        assert_eq!(signer.address(), default_signer().unwrap().address());

        let key = B256::repeat_byte(7);
        let args = SignerArgs { private_key: Some(key), ..Default::default() };
        let expected = PrivateKeySigner::from_bytes(&key).unwrap().address();
        assert_eq!(args.signer().unwrap().address(), expected);
    }

    #[test]
    fn test_validate_duplicate_resolver() {
        let mut args = GatewayArgs::try_parse_from(["ezccip-gateway"]).unwrap();
        args.resolvers = vec![("s".to_string(), Address::ZERO), ("s".to_string(), Address::ZERO)];
        assert!(args.validate().is_err());
    }
}
