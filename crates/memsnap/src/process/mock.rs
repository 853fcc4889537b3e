//! Synthetic address space for testing
//!
//! Provides a configurable implementation of the address space traits
//! backed by in-memory buffers instead of a real process.

use std::borrow::Cow;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::process::{ModuleInfo, ModuleResolver, QueryRegion, ReadMemory, ReadOutcome, ViewMemory};
use crate::region::{MemoryRegion, Protection, RegionKind, RegionState};

/// `ERROR_INVALID_ADDRESS`, reported for addresses outside every region.
pub const MOCK_INVALID_ADDRESS: u32 = 487;

/// Highest address the mock reports free space for.
pub const MOCK_ADDRESS_LIMIT: u64 = 0x7FFF_FFFF_0000;

#[derive(Debug, Clone)]
struct MockRegion {
    region: MemoryRegion,
    data: Vec<u8>,
    /// Bytes readable from the region start before a read comes up short.
    readable: Option<usize>,
    /// Error code returned by every read of this region.
    read_error: Option<u32>,
}

/// Synthetic address space
///
/// Regions are kept sorted by start address. Addresses between regions are
/// reported as free space, the way the OS describes unmapped gaps.
#[derive(Debug, Clone, Default)]
pub struct MockAddressSpace {
    regions: Vec<MockRegion>,
    failing_queries: Vec<Range<u64>>,
    zero_sized: Vec<u64>,
    modules: Vec<ModuleInfo>,
}

impl MockAddressSpace {
    pub fn builder() -> MockAddressSpaceBuilder {
        MockAddressSpaceBuilder::default()
    }

    /// Region descriptors in address order.
    pub fn regions(&self) -> impl Iterator<Item = &MemoryRegion> {
        self.regions.iter().map(|r| &r.region)
    }

    fn find(&self, address: u64) -> Option<&MockRegion> {
        self.regions.iter().find(|r| r.region.contains(address))
    }

    fn next_start_after(&self, address: u64) -> u64 {
        self.regions
            .iter()
            .map(|r| r.region.start)
            .find(|&start| start > address)
            .unwrap_or(MOCK_ADDRESS_LIMIT)
    }
}

impl QueryRegion for MockAddressSpace {
    fn query_region(&self, address: u64) -> Result<MemoryRegion> {
        let query_failed = Error::QueryFailed {
            address,
            code: MOCK_INVALID_ADDRESS,
        };

        if address >= MOCK_ADDRESS_LIMIT
            || self.failing_queries.iter().any(|r| r.contains(&address))
        {
            return Err(query_failed);
        }

        if self.zero_sized.contains(&address) {
            return Ok(MemoryRegion {
                start: address,
                size: 0,
                state: RegionState::Free,
                protection: Protection::NOACCESS,
                kind: RegionKind::Unknown,
            });
        }

        if let Some(mock) = self.find(address) {
            return Ok(mock.region);
        }

        Ok(MemoryRegion {
            start: address,
            size: self.next_start_after(address) - address,
            state: RegionState::Free,
            protection: Protection::NOACCESS,
            kind: RegionKind::Unknown,
        })
    }
}

impl ReadMemory for MockAddressSpace {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<ReadOutcome> {
        let Some(mock) = self.find(address) else {
            return Err(Error::MemoryRead {
                address,
                code: MOCK_INVALID_ADDRESS,
            });
        };

        if let Some(code) = mock.read_error {
            return Err(Error::MemoryRead { address, code });
        }

        let offset = (address - mock.region.start) as usize;
        let limit = mock.readable.unwrap_or(mock.data.len()).min(mock.data.len());
        let available = limit.saturating_sub(offset);
        let copied = available.min(buf.len());
        buf[..copied].copy_from_slice(&mock.data[offset..offset + copied]);

        if copied < buf.len() {
            Ok(ReadOutcome::PartialCopy { bytes_read: copied })
        } else {
            Ok(ReadOutcome::Complete)
        }
    }
}

impl ViewMemory for MockAddressSpace {
    fn view(&self, region: &MemoryRegion) -> Result<Cow<'_, [u8]>> {
        match self.regions.iter().find(|r| r.region.start == region.start) {
            Some(mock) => Ok(Cow::Borrowed(&mock.data)),
            None => Err(Error::MemoryRead {
                address: region.start,
                code: MOCK_INVALID_ADDRESS,
            }),
        }
    }
}

impl ModuleResolver for MockAddressSpace {
    fn resolve_module(&self, name: &str) -> Result<Option<ModuleInfo>> {
        Ok(self
            .modules
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned())
    }
}

/// Builder for synthetic address spaces
///
/// Provides a fluent API for laying out regions and injecting failures.
#[derive(Debug, Clone, Default)]
pub struct MockAddressSpaceBuilder {
    space: MockAddressSpace,
}

impl MockAddressSpaceBuilder {
    /// Add a committed private region holding `data`.
    pub fn region(self, start: u64, protection: Protection, data: Vec<u8>) -> Self {
        let region = MemoryRegion::committed(start, data.len() as u64, protection);
        self.region_with(region, data)
    }

    /// Add a region with an explicit descriptor. `data` is resized to `region.size`.
    pub fn region_with(mut self, region: MemoryRegion, mut data: Vec<u8>) -> Self {
        data.resize(region.size as usize, 0);
        self.space.regions.push(MockRegion {
            region,
            data,
            readable: None,
            read_error: None,
        });
        self.space.regions.sort_by_key(|r| r.region.start);
        self
    }

    /// Add a reserved (uncommitted) region of `size` bytes.
    pub fn reserved(self, start: u64, size: u64) -> Self {
        let region = MemoryRegion {
            start,
            size,
            state: RegionState::Reserved,
            protection: Protection::empty(),
            kind: RegionKind::Private,
        };
        self.region_with(region, Vec::new())
    }

    /// Limit reads of the region starting at `start` to its first `readable` bytes.
    pub fn partial(mut self, start: u64, readable: usize) -> Self {
        if let Some(mock) = self.space.regions.iter_mut().find(|r| r.region.start == start) {
            mock.readable = Some(readable);
        }
        self
    }

    /// Make every read of the region starting at `start` fail with `code`.
    pub fn failing_read(mut self, start: u64, code: u32) -> Self {
        if let Some(mock) = self.space.regions.iter_mut().find(|r| r.region.start == start) {
            mock.read_error = Some(code);
        }
        self
    }

    /// Make region queries inside `range` fail.
    pub fn failing_query(mut self, range: Range<u64>) -> Self {
        self.space.failing_queries.push(range);
        self
    }

    /// Make the query at exactly `address` report a zero-sized region.
    pub fn zero_sized_at(mut self, address: u64) -> Self {
        self.space.zero_sized.push(address);
        self
    }

    /// Register a loaded module covering `[base, base + size)`.
    pub fn module(mut self, name: &str, base: u64, size: u64) -> Self {
        self.space.modules.push(ModuleInfo {
            name: name.to_string(),
            base,
            size,
        });
        self
    }

    pub fn build(self) -> MockAddressSpace {
        self.space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_inside_region() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READONLY, vec![0; 0x2000])
            .build();

        let region = space.query_region(0x1800).unwrap();
        assert_eq!(region.start, 0x1000);
        assert_eq!(region.size, 0x2000);
        assert_eq!(region.state, RegionState::Committed);
    }

    #[test]
    fn test_query_gap_reports_free_space() {
        let space = MockAddressSpace::builder()
            .region(0x4000, Protection::READONLY, vec![0; 0x1000])
            .build();

        let region = space.query_region(0x1000).unwrap();
        assert_eq!(region.start, 0x1000);
        assert_eq!(region.size, 0x3000);
        assert_eq!(region.state, RegionState::Free);
    }

    #[test]
    fn test_query_failure_range() {
        let space = MockAddressSpace::builder()
            .failing_query(0x0..0x3000)
            .build();

        assert!(matches!(
            space.query_region(0x2000),
            Err(Error::QueryFailed { address: 0x2000, .. })
        ));
        assert!(space.query_region(0x3000).is_ok());
    }

    #[test]
    fn test_query_beyond_limit_fails() {
        let space = MockAddressSpace::default();
        assert!(space.query_region(MOCK_ADDRESS_LIMIT).is_err());
    }

    #[test]
    fn test_read_complete() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READWRITE, vec![1, 2, 3, 4])
            .build();

        let mut buf = [0u8; 2];
        let outcome = space.read_into(0x1002, &mut buf).unwrap();
        assert_eq!(outcome, ReadOutcome::Complete);
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn test_read_partial() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READWRITE, vec![9; 16])
            .partial(0x1000, 6)
            .build();

        let mut buf = [0u8; 16];
        let outcome = space.read_into(0x1000, &mut buf).unwrap();
        assert_eq!(outcome, ReadOutcome::PartialCopy { bytes_read: 6 });
        assert_eq!(&buf[..6], &[9; 6]);
        assert_eq!(&buf[6..], &[0; 10]);
    }

    #[test]
    fn test_read_failure() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READWRITE, vec![0; 16])
            .failing_read(0x1000, 5)
            .build();

        let mut buf = [0u8; 16];
        assert!(matches!(
            space.read_into(0x1000, &mut buf),
            Err(Error::MemoryRead { code: 5, .. })
        ));
    }

    #[test]
    fn test_read_unmapped() {
        let space = MockAddressSpace::default();
        let mut buf = [0u8; 4];
        assert!(space.read_into(0x1000, &mut buf).is_err());
    }

    #[test]
    fn test_view_returns_full_region() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READONLY, b"abcd".to_vec())
            .partial(0x1000, 1)
            .build();

        let region = space.query_region(0x1000).unwrap();
        assert_eq!(&*space.view(&region).unwrap(), b"abcd");
    }

    #[test]
    fn test_module_lookup_case_insensitive() {
        let space = MockAddressSpace::builder()
            .module("Game.exe", 0x14000_0000, 0x10000)
            .build();

        let module = space.resolve_module("game.EXE").unwrap().unwrap();
        assert_eq!(module.base, 0x14000_0000);
        assert!(space.resolve_module("missing.dll").unwrap().is_none());
    }

    #[test]
    fn test_regions_sorted() {
        let space = MockAddressSpace::builder()
            .region(0x3000, Protection::READONLY, vec![0; 0x10])
            .region(0x1000, Protection::READONLY, vec![0; 0x10])
            .reserved(0x2000, 0x1000)
            .build();

        let starts: Vec<u64> = space.regions().map(|r| r.start).collect();
        assert_eq!(starts, vec![0x1000, 0x2000, 0x3000]);
    }
}
