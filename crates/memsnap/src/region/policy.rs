//! Region classification policies.
//!
//! A policy decides, from a region's state and protection alone, whether the
//! enumerator hands the region to its consumer.

use super::{MemoryRegion, RegionState};

/// Predicate over region descriptors.
pub trait RegionPolicy {
    fn accepts(&self, region: &MemoryRegion) -> bool;
}

impl<F> RegionPolicy for F
where
    F: Fn(&MemoryRegion) -> bool,
{
    fn accepts(&self, region: &MemoryRegion) -> bool {
        self(region)
    }
}

/// All committed memory that is not a guard page, regardless of access rights.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpPolicy;

impl RegionPolicy for DumpPolicy {
    fn accepts(&self, region: &MemoryRegion) -> bool {
        region.state == RegionState::Committed && !region.protection.is_guard()
    }
}

/// Committed, unguarded memory that can be read or executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanPolicy;

impl RegionPolicy for ScanPolicy {
    fn accepts(&self, region: &MemoryRegion) -> bool {
        DumpPolicy.accepts(region) && region.protection.is_accessible()
    }
}

/// Every region the OS reports, including free and reserved space.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRegions;

impl RegionPolicy for AllRegions {
    fn accepts(&self, _region: &MemoryRegion) -> bool {
        true
    }
}
