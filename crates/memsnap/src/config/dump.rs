use std::path::{Path, PathBuf};

use crate::config::{memory, output};
use crate::region::AddressRange;

/// Settings for a whole-process dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    output: PathBuf,
    range: AddressRange,
    page_size: u64,
}

impl DumpConfig {
    pub fn builder() -> DumpConfigBuilder {
        DumpConfigBuilder::default()
    }

    /// Path of the image file.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Address range walked by the region enumerator.
    pub fn range(&self) -> AddressRange {
        self.range
    }

    /// Cursor advance used when a region query fails.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        DumpConfigBuilder::default().build()
    }
}

/// Builder for [`DumpConfig`].
#[derive(Debug, Clone, Default)]
pub struct DumpConfigBuilder {
    output: Option<PathBuf>,
    range: Option<AddressRange>,
    page_size: Option<u64>,
}

impl DumpConfigBuilder {
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Dump `[0, ceiling)`.
    pub fn ceiling(mut self, ceiling: u64) -> Self {
        self.range = Some(AddressRange::new(0, ceiling));
        self
    }

    pub fn range(mut self, range: AddressRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Page size for the query-failure fallback. Zero is replaced by the default.
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn build(self) -> DumpConfig {
        DumpConfig {
            output: self
                .output
                .unwrap_or_else(|| PathBuf::from(output::DEFAULT_FILE)),
            range: self
                .range
                .unwrap_or_else(|| AddressRange::new(0, memory::DUMP_CEILING)),
            page_size: self
                .page_size
                .filter(|&size| size > 0)
                .unwrap_or(memory::PAGE_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DumpConfig::default();
        assert_eq!(config.output(), Path::new("dump.bin"));
        assert_eq!(config.range(), AddressRange::new(0, 0x1000_0000));
        assert_eq!(config.page_size(), 0x1000);
    }

    #[test]
    fn test_builder_overrides() {
        let config = DumpConfig::builder()
            .output("out/image.bin")
            .ceiling(0x2000_0000)
            .page_size(0x10000)
            .build();

        assert_eq!(config.output(), Path::new("out/image.bin"));
        assert_eq!(config.range().end, 0x2000_0000);
        assert_eq!(config.page_size(), 0x10000);
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config = DumpConfig::builder().page_size(0).build();
        assert_eq!(config.page_size(), memory::PAGE_SIZE);
    }
}
