use tracing::warn;

use crate::diag::format_partial_read;
use crate::error::{Error, Result};
use crate::process::{ReadMemory, ReadOutcome};
use crate::region::MemoryRegion;

/// Bytes captured from one region.
///
/// `bytes` is always exactly `region.size` long; anything past `bytes_read`
/// is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionContent {
    pub region: MemoryRegion,
    pub bytes: Vec<u8>,
    pub bytes_read: u64,
}

impl RegionContent {
    pub fn is_partial(&self) -> bool {
        self.bytes_read < self.region.size
    }

    /// Bytes that could not be read and were zero-filled.
    pub fn shortfall(&self) -> u64 {
        self.region.size - self.bytes_read
    }
}

/// Read a whole region with a single bulk read.
///
/// A partial copy is accepted: the missing tail stays zeroed and a warning is
/// logged. Every other read failure is returned to the caller.
pub fn read_region<R: ReadMemory + ?Sized>(reader: &R, region: &MemoryRegion) -> Result<RegionContent> {
    let size = usize::try_from(region.size).map_err(|_| Error::RegionTooLarge {
        address: region.start,
        size: region.size,
    })?;

    let mut bytes = vec![0u8; size];
    let outcome = reader.read_into(region.start, &mut bytes)?;
    let bytes_read = outcome.bytes_read(size);

    if let ReadOutcome::PartialCopy { .. } = outcome {
        // Readers are not required to leave the tail untouched.
        bytes[bytes_read..].fill(0);
    }

    if bytes_read < size {
        warn!(
            "{}",
            format_partial_read(region.start, region.size, bytes_read as u64)
        );
    }

    Ok(RegionContent {
        region: *region,
        bytes,
        bytes_read: bytes_read as u64,
    })
}
