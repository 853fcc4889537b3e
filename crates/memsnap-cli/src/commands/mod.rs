//! CLI command implementations.

pub mod dump;
pub mod regions;
pub mod scan;
