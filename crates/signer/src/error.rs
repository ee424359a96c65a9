/// An enum representing the errors that can occur in the signer.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// An error occurred while signing.
    #[error("Failed to sign: {0}")]
    SigningError(#[from] alloy_signer::Error),
    /// The protocol name is not one of the supported envelope schemes.
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),
    /// The envelope does not match the layout of its protocol.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] alloy_sol_types::Error),
    /// The signature inside an envelope cannot be parsed or recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] alloy_primitives::SignatureError),
}
