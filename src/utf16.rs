//! Conversion of text into big-endian UTF-16, as used by PDF text strings
//! and `ToUnicode` CMaps.

/// Encode text as big-endian UTF-16, optionally prefixed with the byte order
/// mark `FE FF`.
///
/// ```
/// use fontcut::utf16::encode_utf16_be;
///
/// assert_eq!(encode_utf16_be("A", true), [0xFE, 0xFF, 0x00, 0x41]);
/// assert_eq!(encode_utf16_be("🎉", false), [0xD8, 0x3C, 0xDF, 0x89]);
/// ```
pub fn encode_utf16_be(text: &str, bom: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 * text.len() + 2);
    if bom {
        out.extend([0xFE, 0xFF]);
    }

    for c in text.chars() {
        let cp = c as u32;
        match surrogate_pair(cp) {
            Some((high, low)) => {
                out.extend(high.to_be_bytes());
                out.extend(low.to_be_bytes());
            }
            None => out.extend((cp as u16).to_be_bytes()),
        }
    }

    out
}

/// Split a supplementary plane codepoint into its high and low surrogate.
///
/// Returns `None` for codepoints in the Basic Multilingual Plane, which are
/// encoded as a single unit, and for values beyond U+10FFFF.
pub fn surrogate_pair(cp: u32) -> Option<(u16, u16)> {
    if !(0x10000..=0x10FFFF).contains(&cp) {
        return None;
    }

    let v = cp - 0x10000;
    let high = 0xD800 + (v >> 10) as u16;
    let low = 0xDC00 + (v & 0x3FF) as u16;
    Some((high, low))
}

/// Combine a high and a low surrogate back into a codepoint.
pub fn decode_surrogate_pair(high: u16, low: u16) -> u32 {
    ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00) + 0x10000
}
