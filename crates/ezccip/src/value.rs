use alloy_dyn_abi::DynSolValue;
use alloy_primitives::hex;
use ezccip_primitives::asciiize;

/// Renders a decoded argument for the call trace.
pub(crate) fn display_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::String(s) => asciiize(s),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Bytes(b) => hex::encode_prefixed(b),
        DynSolValue::Array(values) |
        DynSolValue::FixedArray(values) |
        DynSolValue::Tuple(values) => {
            format!("[{}]", values.iter().map(display_value).collect::<Vec<_>>().join(","))
        }
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}
