//! Common CLI utility functions shared across commands.

use anyhow::{Context, Result};

/// Parse a hex address or size, with or without a `0x` prefix.
pub fn parse_hex_address(value: &str) -> Result<u64> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid hex value '{}'", value))
}

/// Parse the dump PID argument. Anything that is not a decimal `u32` is ignored.
pub fn parse_pid(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_address() {
        assert_eq!(parse_hex_address("0x10000000").unwrap(), 0x1000_0000);
        assert_eq!(parse_hex_address("0XfF").unwrap(), 0xFF);
        assert_eq!(parse_hex_address("7ff6a000").unwrap(), 0x7FF6_A000);
    }

    #[test]
    fn test_parse_hex_address_invalid() {
        assert!(parse_hex_address("0x").is_err());
        assert!(parse_hex_address("xyz").is_err());
    }

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid(Some("1234")), Some(1234));
        assert_eq!(parse_pid(Some("notepad")), None);
        assert_eq!(parse_pid(Some("-1")), None);
        assert_eq!(parse_pid(Some("123abc")), None);
        assert_eq!(parse_pid(Some(" 42 ")), Some(42));
        assert_eq!(parse_pid(None), None);
    }
}
