/// An error that can occur while handling the primitive wire formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    /// The buffer is not a valid DNS-encoded name.
    #[error("invalid DNS-encoded name")]
    InvalidDnsName,
    /// A label cannot be represented in DNS wire format.
    #[error("invalid label: {0:?}")]
    InvalidLabel(String),
    /// The string is not an even-length, 0x-prefixed hex string.
    #[error("expected hex string")]
    InvalidHex,
}
