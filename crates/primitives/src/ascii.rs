/// Renders a string using printable ASCII only.
///
/// Every code point outside of `0x20..=0x7E` is replaced by its upper-case hex value wrapped in
/// braces (at least two digits), e.g. `"a\u{1F4A9}"` becomes `"a{1F4A9}"`. Used when writing
/// untrusted names and text keys into request logs.
pub fn asciiize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        let cp = ch as u32;
        if (0x20..=0x7e).contains(&cp) {
            out.push(ch);
        } else {
            out.push_str(&format!("{{{cp:02X}}}"));
        }
    }
    out
}
