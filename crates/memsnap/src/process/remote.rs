//! Region views over a cross-process reader.

use std::borrow::Cow;

use crate::dump::read_region;
use crate::error::Result;
use crate::process::{ModuleInfo, ModuleResolver, QueryRegion, ReadMemory, ViewMemory};
use crate::region::MemoryRegion;

/// Adapts a cross-process reader for the pattern scanner.
///
/// Each region is copied out through the dump path's content reader, so a
/// partial copy yields a zero-filled tail instead of an error. In-process
/// scans through `LocalMemory` read pages directly and get no such tolerance.
#[derive(Debug, Clone, Copy)]
pub struct RemoteView<R> {
    inner: R,
}

impl<R> RemoteView<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: QueryRegion> QueryRegion for RemoteView<R> {
    fn query_region(&self, address: u64) -> Result<MemoryRegion> {
        self.inner.query_region(address)
    }
}

impl<R: ReadMemory> ViewMemory for RemoteView<R> {
    fn view(&self, region: &MemoryRegion) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Owned(read_region(&self.inner, region)?.bytes))
    }
}

impl<R: ModuleResolver> ModuleResolver for RemoteView<R> {
    fn resolve_module(&self, name: &str) -> Result<Option<ModuleInfo>> {
        self.inner.resolve_module(name)
    }
}
