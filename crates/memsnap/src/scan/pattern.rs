//! Byte pattern matching and parsing.

use crate::error::{Error, Result};

/// Find all occurrences of a pattern in a buffer.
///
/// Returns the byte offsets where the pattern starts. Overlapping occurrences
/// are all reported.
///
/// # Example
///
/// ```
/// use memsnap::scan::pattern::find_pattern;
///
/// let matches = find_pattern(b"AAAA", b"AAA");
/// assert_eq!(matches, vec![0, 1]);
/// ```
pub fn find_pattern(buffer: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > buffer.len() {
        return Vec::new();
    }

    buffer
        .windows(pattern.len())
        .enumerate()
        .filter_map(|(i, window)| if window == pattern { Some(i) } else { None })
        .collect()
}

/// Find all occurrences of a pattern in `len` bytes starting at `base`.
///
/// Every byte is fetched with a volatile read through the raw pointer, so no
/// reference to the searched memory exists while the search runs. The memory
/// may change underneath the search; each byte is compared as it was when read.
///
/// # Safety
///
/// `base..base + len` must stay mapped and readable for the whole call.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub(crate) unsafe fn find_pattern_raw(base: *const u8, len: usize, pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > len {
        return Vec::new();
    }

    (0..=len - pattern.len())
        .filter(|&offset| {
            pattern.iter().enumerate().all(|(i, &expected)| {
                // SAFETY: offset + i < len, and the caller guarantees the range is readable.
                unsafe { base.add(offset + i).read_volatile() == expected }
            })
        })
        .collect()
}

/// Parse a hex byte pattern such as `"48 8B 05"`, `"488B05"` or `"0x48 0x8B"`.
///
/// Tokens are separated by whitespace; each token is an even number of hex
/// digits with an optional `0x` prefix. Wildcards are not supported.
pub fn parse_hex_pattern(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for token in text.split_whitespace() {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        if digits.contains('?') {
            return Err(Error::InvalidPattern(format!(
                "wildcards are not supported: '{}'",
                token
            )));
        }
        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(Error::InvalidPattern(format!(
                "expected an even number of hex digits in '{}'",
                token
            )));
        }

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidPattern(format!("invalid hex digits in '{}'", token)));
        }

        for i in (0..digits.len()).step_by(2) {
            let pair = &digits[i..i + 2];
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::InvalidPattern(format!("invalid hex byte '{}'", pair)))?;
            bytes.push(byte);
        }
    }

    if bytes.is_empty() {
        return Err(Error::EmptyPattern);
    }
    Ok(bytes)
}
