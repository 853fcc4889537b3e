//! Literal byte pattern search over committed memory.
//!
//! The scanner walks its target range with `ScanPolicy` and searches each
//! accepted region on its own. An occurrence that spans two regions is not
//! reported, even when the regions are adjacent.

pub mod pattern;

use std::fmt;

use serde::Serialize;
use tracing::debug;

pub use pattern::{find_pattern, parse_hex_pattern};

use crate::config::memory::PAGE_SIZE;
use crate::diag::format_address;
use crate::error::{Error, Result};
use crate::process::{ModuleResolver, QueryRegion, ViewMemory};
use crate::region::{AddressRange, RegionEnumerator, ScanPolicy};

/// What to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScanTarget {
    /// `size` bytes starting at `base`.
    Range { base: u64, size: u64 },
    /// The image range of a loaded module.
    Module(String),
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanTarget::Range { base, size } => {
                write!(f, "0x{} (+{:#x})", format_address(*base), size)
            }
            ScanTarget::Module(name) => write!(f, "module '{}'", name),
        }
    }
}

/// Pattern scanner over a memory source.
pub struct PatternScanner<'a, M> {
    memory: &'a M,
    page_size: u64,
}

impl<'a, M: QueryRegion + ViewMemory> PatternScanner<'a, M> {
    pub fn new(memory: &'a M) -> Self {
        Self {
            memory,
            page_size: PAGE_SIZE,
        }
    }

    /// Override the step the region walk takes after a failed query.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    /// Find every occurrence of `pattern` in the scannable regions of
    /// `[base, base + size)`.
    ///
    /// Each accepted region is searched over its full extent through
    /// [`ViewMemory::search`], so matches may fall outside the requested range
    /// when a region straddles its bounds.
    /// Addresses are ordered by region, then by position within the region.
    pub fn scan_range(&self, base: u64, size: u64, pattern: &[u8]) -> Result<Vec<u64>> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }

        let range = AddressRange::from_base_size(base, size);
        let regions =
            RegionEnumerator::new(self.memory, range, ScanPolicy).with_page_size(self.page_size);

        let mut matches = Vec::new();
        for region in regions {
            let region = region?;
            let found = self.memory.search(&region, pattern)?;

            if !found.is_empty() {
                debug!(
                    "{} matches in region 0x{} ({} bytes)",
                    found.len(),
                    format_address(region.start),
                    region.size
                );
            }
            matches.extend(found.into_iter().map(|offset| region.start + offset as u64));
        }

        Ok(matches)
    }
}

impl<'a, M: QueryRegion + ViewMemory + ModuleResolver> PatternScanner<'a, M> {
    /// Find every occurrence of `pattern` inside the image of module `name`.
    ///
    /// A module that is not loaded yields no matches.
    pub fn scan_module(&self, name: &str, pattern: &[u8]) -> Result<Vec<u64>> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }

        match self.memory.resolve_module(name)? {
            Some(module) => {
                debug!(
                    "Module {} at 0x{} ({} bytes)",
                    module.name,
                    format_address(module.base),
                    module.size
                );
                self.scan_range(module.base, module.size, pattern)
            }
            None => {
                debug!("Module {} is not loaded", name);
                Ok(Vec::new())
            }
        }
    }

    pub fn scan(&self, target: &ScanTarget, pattern: &[u8]) -> Result<Vec<u64>> {
        match target {
            ScanTarget::Range { base, size } => self.scan_range(*base, *size, pattern),
            ScanTarget::Module(name) => self.scan_module(name, pattern),
        }
    }
}
