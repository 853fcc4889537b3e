//! Region enumeration.
//!
//! Walks an address range with one region query per step, yielding the regions
//! a policy accepts. The walk is lazy: nothing is queried until the iterator is
//! advanced.

use tracing::debug;

use super::{AddressRange, MemoryRegion, MemorySnapshot, RegionPolicy};
use crate::config::memory::PAGE_SIZE;
use crate::diag::format_address;
use crate::error::{Error, Result};
use crate::process::QueryRegion;

/// Iterator over the regions of an address range.
///
/// A failed query (or one reporting a zero-sized region) advances the cursor by
/// one page and the walk continues. Any other error is yielded once and ends
/// the iteration.
///
/// # Example
///
/// ```ignore
/// use memsnap::region::{AddressRange, DumpPolicy, RegionEnumerator};
///
/// let range = AddressRange::new(0, 0x1000_0000);
/// for region in RegionEnumerator::new(&process, range, DumpPolicy) {
///     let region = region?;
///     // Process region
/// }
/// ```
pub struct RegionEnumerator<Q, P> {
    source: Q,
    policy: P,
    cursor: u64,
    end: u64,
    page_size: u64,
    finished: bool,
}

impl<Q: QueryRegion, P: RegionPolicy> RegionEnumerator<Q, P> {
    /// Create an enumerator over `range`, keeping the regions `policy` accepts.
    pub fn new(source: Q, range: AddressRange, policy: P) -> Self {
        Self {
            source,
            policy,
            cursor: range.start,
            end: range.end,
            page_size: PAGE_SIZE,
            finished: false,
        }
    }

    /// Override the step used after a failed query. Zero is ignored.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Run the walk to completion.
    pub fn snapshot(self) -> Result<MemorySnapshot> {
        self.collect::<Result<Vec<_>>>().map(MemorySnapshot::new)
    }

    fn skip_page(&mut self) {
        self.cursor = self.cursor.saturating_add(self.page_size);
    }
}

impl<Q: QueryRegion, P: RegionPolicy> Iterator for RegionEnumerator<Q, P> {
    type Item = Result<MemoryRegion>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished && self.cursor < self.end {
            let address = self.cursor;

            let region = match self.source.query_region(address) {
                Ok(region) => region,
                Err(Error::QueryFailed { code, .. }) => {
                    debug!(
                        "Region query failed at 0x{} (error {}), skipping one page",
                        format_address(address),
                        code
                    );
                    self.skip_page();
                    continue;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            if region.size == 0 {
                debug!(
                    "Zero-sized region reported at 0x{}, skipping one page",
                    format_address(address)
                );
                self.skip_page();
                continue;
            }

            let next = region.end();
            if next > address {
                self.cursor = next;
            } else {
                self.skip_page();
            }

            if self.policy.accepts(&region) {
                return Some(Ok(region));
            }
        }

        None
    }
}
