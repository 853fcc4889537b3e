use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("DebugActiveProcess() failed with error {code} (0x{code:08x}) for process {pid}")]
    Attach { pid: u32, code: u32 },

    #[error("OpenProcess() failed with error {code} (0x{code:08x}) for process {pid}")]
    ProcessOpen { pid: u32, code: u32 },

    #[error("VirtualQueryEx() failed with error {code} (0x{code:08x}) at address {address:#x}")]
    QueryFailed { address: u64, code: u32 },

    #[error("ReadProcessMemory() failed with error {code} (0x{code:08x}) at address {address:#x}")]
    MemoryRead { address: u64, code: u32 },

    #[error("GetModuleInformation() failed with error {code} (0x{code:08x}) for module '{name}'")]
    ModuleQuery { name: String, code: u32 },

    #[error("Region at {address:#x} is too large to buffer ({size} bytes)")]
    RegionTooLarge { address: u64, size: u64 },

    #[error("Search pattern must not be empty")]
    EmptyPattern,

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Unsupported platform: {0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_failure_message_format() {
        let err = Error::ProcessOpen { pid: 42, code: 5 };
        assert_eq!(
            err.to_string(),
            "OpenProcess() failed with error 5 (0x00000005) for process 42"
        );
    }

    #[test]
    fn test_read_failure_message_includes_address() {
        let err = Error::MemoryRead {
            address: 0x7ff0_1000,
            code: 998,
        };
        let message = err.to_string();
        assert!(message.starts_with("ReadProcessMemory() failed with error 998 (0x000003e6)"));
        assert!(message.ends_with("0x7ff01000"));
    }
}
