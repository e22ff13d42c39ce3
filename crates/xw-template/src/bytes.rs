//! Byte-scanning helpers built on `memchr`, used by the parser to locate
//! delimiters without falling back to naive per-byte loops.

use memchr::memmem;

/// Finds the first occurrence of `pattern` at or after `offset`.
pub fn find_bytes(s: &[u8], pattern: &[u8], offset: usize) -> Option<usize> {
    if pattern.is_empty() {
        return Some(offset);
    }
    if offset > s.len() {
        return None;
    }
    memmem::find(&s[offset..], pattern).map(|pos| pos + offset)
}

/// Checks whether `s[offset..]` begins with `pattern`, ignoring ASCII case.
pub fn starts_with_ignore_case(s: &[u8], pattern: &[u8], offset: usize) -> bool {
    let end = offset + pattern.len();
    if end > s.len() {
        return false;
    }
    s[offset..end].eq_ignore_ascii_case(pattern)
}

/// Trims ASCII whitespace from both ends of a byte slice.
pub fn trim(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|b| !b.is_ascii_whitespace());
    let Some(start) = start else {
        return &s[0..0];
    };
    let end = s.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap();
    &s[start..=end]
}

/// Trims trailing ASCII whitespace only.
pub fn rtrim(s: &[u8]) -> &[u8] {
    match s.iter().rposition(|b| !b.is_ascii_whitespace()) {
        Some(end) => &s[..=end],
        None => &s[0..0],
    }
}
