//! # memsnap
//!
//! Core library for the memsnap process memory tools.
//!
//! This crate provides:
//! - Virtual memory region enumeration and classification
//! - Whole-process dumps into a sparse image addressed by virtual address
//! - Literal byte pattern scans over address ranges or loaded modules
//! - RAII debug sessions and process handles (Windows)
//!
//! The OS is reached through the traits in [`process::provider`]; every
//! algorithm also runs against [`process::MockAddressSpace`].

pub mod config;
pub mod diag;
pub mod dump;
pub mod error;
pub mod process;
pub mod region;
pub mod scan;

// Re-export from config module
pub use config::{DumpConfig, DumpConfigBuilder};

// Re-export from dump module
pub use dump::{
    DumpReport, PartialRead, RegionContent, SparseImageWriter, dump_process, dump_regions,
    read_region,
};

// Re-export from error module
pub use error::{Error, Result};

// Re-export from process module
pub use process::{
    DebugSession, LocalMemory, ModuleInfo, ModuleResolver, ProcessHandle, QueryRegion,
    ReadMemory, ReadOutcome, RemoteView, ViewMemory,
};

// Re-export from region module
pub use region::{
    AddressRange, AllRegions, DumpPolicy, DumpStatistics, MemoryRegion, MemorySnapshot,
    Protection, RegionEnumerator, RegionKind, RegionPolicy, RegionState, ScanPolicy,
};

// Re-export from scan module
pub use scan::{PatternScanner, ScanTarget, find_pattern, parse_hex_pattern};
