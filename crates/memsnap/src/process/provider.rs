//! Address space access abstractions.
//!
//! These traits are the seam between the region walker and the operating
//! system. `ProcessHandle` and `LocalMemory` implement them for real
//! processes; `MockAddressSpace` implements them for tests.

use std::borrow::Cow;

use serde::Serialize;

use crate::error::Result;
use crate::region::MemoryRegion;
use crate::scan::pattern::find_pattern;

/// Result of a bulk read that did not hard-fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Every requested byte was transferred.
    Complete,
    /// Only the first `bytes_read` bytes were transferred.
    PartialCopy { bytes_read: usize },
}

impl ReadOutcome {
    /// Number of bytes transferred into a buffer of `requested` bytes.
    pub fn bytes_read(&self, requested: usize) -> usize {
        match *self {
            ReadOutcome::Complete => requested,
            ReadOutcome::PartialCopy { bytes_read } => bytes_read.min(requested),
        }
    }
}

/// Query the region that contains an address.
pub trait QueryRegion {
    /// Describe the region containing `address`.
    ///
    /// Returns `Error::QueryFailed` for addresses the OS cannot describe; the
    /// enumerator skips those and keeps walking.
    fn query_region(&self, address: u64) -> Result<MemoryRegion>;
}

/// Read bytes out of a (possibly foreign) address space.
pub trait ReadMemory {
    /// Fill `buf` with the bytes starting at `address`.
    ///
    /// A partial copy is reported through `ReadOutcome`, never as an error.
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<ReadOutcome>;

    /// Read `size` bytes, zero-filling whatever a partial copy left untouched.
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        self.read_into(address, &mut buffer)?;
        Ok(buffer)
    }
}

/// Direct access to the bytes of a region.
pub trait ViewMemory {
    /// Bytes of `region`, exactly `region.size` long.
    fn view(&self, region: &MemoryRegion) -> Result<Cow<'_, [u8]>>;

    /// Offsets of every occurrence of `pattern` within `region`.
    ///
    /// The default searches the bytes returned by [`ViewMemory::view`].
    fn search(&self, region: &MemoryRegion, pattern: &[u8]) -> Result<Vec<usize>> {
        Ok(find_pattern(&self.view(region)?, pattern))
    }
}

/// A loaded module's image range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub base: u64,
    pub size: u64,
}

/// Look up loaded modules by name.
pub trait ModuleResolver {
    /// Find a loaded module. `Ok(None)` when no module with that name is loaded.
    fn resolve_module(&self, name: &str) -> Result<Option<ModuleInfo>>;
}

impl<T: QueryRegion + ?Sized> QueryRegion for &T {
    fn query_region(&self, address: u64) -> Result<MemoryRegion> {
        (**self).query_region(address)
    }
}

impl<T: ReadMemory + ?Sized> ReadMemory for &T {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<ReadOutcome> {
        (**self).read_into(address, buf)
    }
}

impl<T: ViewMemory + ?Sized> ViewMemory for &T {
    fn view(&self, region: &MemoryRegion) -> Result<Cow<'_, [u8]>> {
        (**self).view(region)
    }

    fn search(&self, region: &MemoryRegion, pattern: &[u8]) -> Result<Vec<usize>> {
        (**self).search(region, pattern)
    }
}

impl<T: ModuleResolver + ?Sized> ModuleResolver for &T {
    fn resolve_module(&self, name: &str) -> Result<Option<ModuleInfo>> {
        (**self).resolve_module(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::mock::MockAddressSpace;
    use crate::region::Protection;

    #[test]
    fn test_bytes_read_complete() {
        assert_eq!(ReadOutcome::Complete.bytes_read(16), 16);
    }

    #[test]
    fn test_bytes_read_partial_clamped() {
        assert_eq!(ReadOutcome::PartialCopy { bytes_read: 4 }.bytes_read(16), 4);
        assert_eq!(ReadOutcome::PartialCopy { bytes_read: 64 }.bytes_read(16), 16);
    }

    #[test]
    fn test_read_bytes_zero_fills_partial() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READWRITE, vec![0xAA; 8])
            .partial(0x1000, 3)
            .build();

        let bytes = space.read_bytes(0x1000, 8).unwrap();
        assert_eq!(bytes, vec![0xAA, 0xAA, 0xAA, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_default_search_uses_view() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READONLY, b"xAAAAx".to_vec())
            .build();
        let region = space.query_region(0x1000).unwrap();

        assert_eq!(space.search(&region, b"AAA").unwrap(), vec![1, 2]);
        assert_eq!((&space).search(&region, b"AAA").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_trait_through_reference() {
        let space = MockAddressSpace::builder()
            .region(0x1000, Protection::READONLY, vec![1, 2, 3, 4])
            .build();
        let by_ref = &space;

        assert_eq!(by_ref.query_region(0x1002).unwrap().start, 0x1000);
        assert_eq!(by_ref.read_bytes(0x1000, 4).unwrap(), vec![1, 2, 3, 4]);
    }
}
