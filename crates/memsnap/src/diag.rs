//! Diagnostic text formatting.

use crate::config::diag::CODE_WIDTH;

/// Number of hex digits used to print `value` as an address.
///
/// Values are padded to the smallest of 2, 4, 8 or 16 digits that holds them.
pub fn address_width(value: u64) -> usize {
    if value < 0x100 {
        2
    } else if value < 0x1_0000 {
        4
    } else if value < 0x1_0000_0000 {
        8
    } else {
        16
    }
}

/// Format `value` as zero-padded lowercase hex using [`address_width`], without prefix.
pub fn format_address(value: u64) -> String {
    format!("{:0width$x}", value, width = address_width(value))
}

/// Format an OS call failure the way every diagnostic in this crate reports one.
pub fn format_os_failure(operation: &str, code: u32) -> String {
    format!(
        "{}() failed with error {} (0x{:0width$x})",
        operation,
        code,
        code,
        width = CODE_WIDTH
    )
}

/// Format the warning emitted when a region could only be partially read.
pub fn format_partial_read(address: u64, size: u64, bytes_read: u64) -> String {
    format!(
        "Warning: region starting at 0x{} has size {}, but only {} bytes could be read",
        format_address(address),
        size,
        bytes_read
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_width_boundaries() {
        assert_eq!(address_width(0), 2);
        assert_eq!(address_width(0xff), 2);
        assert_eq!(address_width(0x100), 4);
        assert_eq!(address_width(0xffff), 4);
        assert_eq!(address_width(0x1_0000), 8);
        assert_eq!(address_width(0xffff_ffff), 8);
        assert_eq!(address_width(0x1_0000_0000), 16);
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0x5), "05");
        assert_eq!(format_address(0x5000), "5000");
        assert_eq!(format_address(0x12_3000), "00123000");
        assert_eq!(format_address(0x7ff6_0000_1000), "00007ff600001000");
    }

    #[test]
    fn test_format_os_failure() {
        assert_eq!(
            format_os_failure("DebugActiveProcessStop", 87),
            "DebugActiveProcessStop() failed with error 87 (0x00000057)"
        );
    }

    #[test]
    fn test_format_partial_read() {
        assert_eq!(
            format_partial_read(0x5000, 0x2000, 0x1000),
            "Warning: region starting at 0x5000 has size 8192, but only 4096 bytes could be read"
        );
    }
}
