//! DNS wire-format names as used by ENSIP-10 `resolve(bytes name, bytes data)`.

use super::PrimitivesError;
use alloy_primitives::Bytes;

/// The longest label a single length byte can describe.
const MAX_LABEL_LENGTH: usize = 255;

/// Decodes a DNS-encoded name into its labels.
///
/// The buffer is a sequence of length-prefixed UTF-8 labels terminated by a zero length byte
/// which must be the final byte. Labels that contain a `.` are rejected since the dot-joined
/// form would be ambiguous.
pub fn labels_from_dns_encoded(buf: &[u8]) -> Result<Vec<String>, PrimitivesError> {
    let mut labels = Vec::new();
    let mut pos = 0;
    loop {
        let len = *buf.get(pos).ok_or(PrimitivesError::InvalidDnsName)? as usize;
        pos += 1;
        if len == 0 {
            if pos != buf.len() {
                return Err(PrimitivesError::InvalidDnsName);
            }
            return Ok(labels);
        }
        let end = pos + len;
        let label = buf.get(pos..end).ok_or(PrimitivesError::InvalidDnsName)?;
        let label = std::str::from_utf8(label).map_err(|_| PrimitivesError::InvalidDnsName)?;
        if label.contains('.') {
            return Err(PrimitivesError::InvalidDnsName);
        }
        labels.push(label.to_owned());
        pos = end;
    }
}

/// Decodes a DNS-encoded name into its dot-joined form.
pub fn name_from_dns_encoded(buf: &[u8]) -> Result<String, PrimitivesError> {
    labels_from_dns_encoded(buf).map(|labels| labels.join("."))
}

/// Encodes a dot-joined name into DNS wire format.
///
/// The empty name encodes to the root (a single zero byte).
pub fn dns_encode(name: &str) -> Result<Bytes, PrimitivesError> {
    let mut out = Vec::with_capacity(name.len() + 2);
    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
                return Err(PrimitivesError::InvalidLabel(label.to_owned()));
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }
    out.push(0);
    Ok(out.into())
}
