/// The default port of the gateway.
pub const DEFAULT_PORT: u16 = 8016;

/// The seed of the default signing key, `keccak256("ezccip")`.
pub const DEFAULT_SIGNING_KEY_SEED: &str = "ezccip";

/// The resolver key matching every path.
pub const WILDCARD_RESOLVER: &str = "*";
