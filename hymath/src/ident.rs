//! Identifier grammar for symbol names, content dictionaries and variables.
//!
//! An identifier starts with an ASCII letter, `_`, `:` or a character from the
//! Greek and Coptic block (U+0374 to U+03FF), and continues with the same
//! characters plus ASCII digits, `.` and `-`. This is a subset of the names the
//! OpenMath standard allows.
//!
//! Arbitrary text can be embedded as an identifier with
//! [`encode_as_identifier`] and recovered with [`decode_identifier`].

const ESCAPE_PREFIX: &str = "id_";

#[inline]
fn is_extended_letter(c: char) -> bool {
    ('\u{0374}'..='\u{03FF}').contains(&c)
}

#[inline]
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || is_extended_letter(c)
}

#[inline]
fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit() || c == '.' || c == '-'
}

/// Return `true` if `s` matches the identifier grammar.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}

/// Return `true` if `s` is an optionally signed sequence of decimal digits.
pub fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Escape arbitrary text into a valid identifier.
///
/// The result is `id_` followed by four lowercase hexadecimal digits per UTF-16
/// code unit of `text`.
///
/// ```
/// use hymath::ident::{decode_identifier, encode_as_identifier, is_identifier};
///
/// let ident = encode_as_identifier("a b");
/// assert_eq!(ident, "id_006100200062");
/// assert!(is_identifier(&ident));
/// assert_eq!(decode_identifier(&ident).as_deref(), Some("a b"));
/// ```
pub fn encode_as_identifier(text: &str) -> String {
    let mut result = String::with_capacity(ESCAPE_PREFIX.len() + 4 * text.len());
    result.push_str(ESCAPE_PREFIX);
    for unit in text.encode_utf16() {
        result.push_str(&format!("{unit:04x}"));
    }
    result
}

/// Inverse of [`encode_as_identifier`].
///
/// Returns `None` if `ident` lacks the `id_` prefix, if the remaining length is
/// not a multiple of four, or if the digits do not form valid UTF-16.
pub fn decode_identifier(ident: &str) -> Option<String> {
    let digits = ident.strip_prefix(ESCAPE_PREFIX)?;
    if digits.len() % 4 != 0 || !digits.is_ascii() {
        return None;
    }

    let units = digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let chunk = std::str::from_utf8(chunk).ok()?;
            u16::from_str_radix(chunk, 16).ok()
        })
        .collect::<Option<Vec<u16>>>()?;

    String::from_utf16(&units).ok()
}
