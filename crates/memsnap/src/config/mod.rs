//! Configuration for dump and scan operations.
//!
//! This module contains:
//! - `DumpConfig` / `DumpConfigBuilder` - settings for a whole-process dump
//! - Memory layout, output, and diagnostic constants

mod dump;

pub use dump::*;

/// Address space layout constants.
pub mod memory {
    /// Step used to skip over addresses whose region query fails.
    pub const PAGE_SIZE: u64 = 0x1000;

    /// Exclusive upper bound of the whole-process dump walk.
    pub const DUMP_CEILING: u64 = 0x1000_0000;
}

/// Output file configuration.
pub mod output {
    /// Image file name used when none is given.
    pub const DEFAULT_FILE: &str = "dump.bin";
}

/// Diagnostic formatting configuration.
pub mod diag {
    /// Hex digits used when printing OS error codes.
    pub const CODE_WIDTH: usize = 8;
}
