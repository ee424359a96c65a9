use crate::constants::WILDCARD_RESOLVER;
use alloy_primitives::Address;
use ezccip_primitives::is_hex;
use std::collections::HashMap;

/// Maps the path of a request to the origin its response is signed for.
///
/// In order of precedence the origin is:
/// 1. the first path segment that is a 0x-prefixed 20 byte address,
/// 2. the resolver registered for the path without its leading `/`,
/// 3. the resolver registered for `*`,
/// 4. the fallback origin.
///
/// If none applies the core signs for the sender.
#[derive(Debug, Clone, Default)]
pub struct OriginResolver {
    resolvers: HashMap<String, Address>,
    fallback: Option<Address>,
}

impl OriginResolver {
    /// Creates a new [`OriginResolver`] with an optional fallback origin.
    pub fn new(fallback: Option<Address>) -> Self {
        Self { resolvers: HashMap::new(), fallback }
    }

    /// Registers the origin for a path key.
    pub fn with_resolver(mut self, key: impl Into<String>, origin: Address) -> Self {
        self.resolvers.insert(key.into(), origin);
        self
    }

    /// Returns the origin for a request path, if any.
    pub fn resolve(&self, path: &str) -> Option<Address> {
        path_address(path)
            .or_else(|| {
                let key = path.strip_prefix('/').unwrap_or(path);
                self.resolvers.get(key).or_else(|| self.resolvers.get(WILDCARD_RESOLVER)).copied()
            })
            .or(self.fallback)
    }
}

fn path_address(path: &str) -> Option<Address> {
    path.split('/').find(|s| s.len() == 42 && is_hex(s)).and_then(|s| s.parse().ok())
}
