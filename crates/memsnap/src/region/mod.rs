//! Virtual memory region model and traversal.
//!
//! - `MemoryRegion` and friends describe what one region query returns
//! - `RegionPolicy` implementations classify regions for dumping or scanning
//! - `RegionEnumerator` walks an address range one query at a time
//! - `MemorySnapshot` holds the accepted regions of one walk

mod enumerator;
pub mod policy;
mod snapshot;
mod types;

pub use enumerator::RegionEnumerator;
pub use policy::{AllRegions, DumpPolicy, RegionPolicy, ScanPolicy};
pub use snapshot::{DumpStatistics, MemorySnapshot};
pub use types::*;
