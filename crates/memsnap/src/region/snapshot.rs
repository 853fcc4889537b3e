use serde::Serialize;

use super::MemoryRegion;

/// Flat versus packed size of a snapshot.
///
/// Their divergence measures how sparse the captured address space is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DumpStatistics {
    /// End address of the last region, i.e. the logical size of the image.
    pub flat_size: u64,
    /// Sum of region sizes, i.e. the bytes actually copied.
    pub packed_size: u64,
}

impl DumpStatistics {
    /// Fraction of the flat image that is backed by captured bytes.
    pub fn density(&self) -> f64 {
        if self.flat_size == 0 {
            0.0
        } else {
            self.packed_size as f64 / self.flat_size as f64
        }
    }
}

/// Regions accepted by one enumeration, in ascending address order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    regions: Vec<MemoryRegion>,
}

impl MemorySnapshot {
    /// Build a snapshot from regions already in traversal order.
    pub fn new(regions: Vec<MemoryRegion>) -> Self {
        debug_assert!(
            regions.windows(2).all(|w| w[0].end() <= w[1].start),
            "snapshot regions must be ascending and non-overlapping"
        );
        Self { regions }
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemoryRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Flat and packed sizes, or `None` for an empty snapshot.
    pub fn statistics(&self) -> Option<DumpStatistics> {
        let last = self.regions.last()?;
        Some(DumpStatistics {
            flat_size: last.end(),
            packed_size: self.regions.iter().map(|r| r.size).sum(),
        })
    }
}

impl IntoIterator for MemorySnapshot {
    type Item = MemoryRegion;
    type IntoIter = std::vec::IntoIter<MemoryRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.into_iter()
    }
}

impl<'a> IntoIterator for &'a MemorySnapshot {
    type Item = &'a MemoryRegion;
    type IntoIter = std::slice::Iter<'a, MemoryRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
