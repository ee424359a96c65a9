use alloy_primitives::Signature;

/// Trait for the signature byte representation carried inside response envelopes.
pub trait SignatureAsBytes {
    /// Returns `r || s || v` where `v` is `27 + y_parity`, the layout `ecrecover` based
    /// verifiers expect.
    fn sig_as_bytes(&self) -> [u8; 65];
}

impl SignatureAsBytes for Signature {
    #[inline]
    fn sig_as_bytes(&self) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[..32].copy_from_slice(&self.r().to_be_bytes::<32>());
        sig[32..64].copy_from_slice(&self.s().to_be_bytes::<32>());
        sig[64] = 27 + self.v() as u8;
        sig
    }
}
