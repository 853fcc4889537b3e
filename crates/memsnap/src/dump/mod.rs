//! Whole-process memory dumping.
//!
//! The dump path runs the region enumerator with `DumpPolicy`, reads every
//! accepted region through the content reader and hands the bytes to the
//! sparse image writer:
//!
//! ```text
//! enumerate (DumpPolicy) -> read_region -> SparseImageWriter
//! ```

mod image;
mod reader;

pub use image::SparseImageWriter;
pub use reader::{RegionContent, read_region};

use std::io::{Seek, Write};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::DumpConfig;
use crate::error::Result;
use crate::process::{DebugSession, ProcessHandle, QueryRegion, ReadMemory};
use crate::region::{AddressRange, DumpPolicy, DumpStatistics, RegionEnumerator};

/// A region that could only be partially read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartialRead {
    pub address: u64,
    pub size: u64,
    pub bytes_read: u64,
}

/// Outcome of a completed dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DumpReport {
    /// `None` when no committed region was found.
    pub statistics: Option<DumpStatistics>,
    pub regions_written: usize,
    pub partial_reads: Vec<PartialRead>,
}

/// Dump every committed, unguarded region of `range` into `writer`.
///
/// Regions are processed in ascending address order. The first read failure
/// other than a partial copy aborts the dump.
pub fn dump_regions<S, W>(
    source: &S,
    range: AddressRange,
    page_size: u64,
    writer: &mut SparseImageWriter<W>,
) -> Result<DumpReport>
where
    S: QueryRegion + ReadMemory + ?Sized,
    W: Write + Seek,
{
    let snapshot = RegionEnumerator::new(source, range, DumpPolicy)
        .with_page_size(page_size)
        .snapshot()?;
    debug!("Found {} committed regions", snapshot.len());

    let statistics = snapshot.statistics();
    if let Some(stats) = statistics {
        info!(
            "Flat size: {}, packed size: {}",
            stats.flat_size, stats.packed_size
        );
    }

    let mut report = DumpReport {
        statistics,
        ..Default::default()
    };

    for region in &snapshot {
        let content = read_region(source, region)?;
        if content.is_partial() {
            report.partial_reads.push(PartialRead {
                address: region.start,
                size: region.size,
                bytes_read: content.bytes_read,
            });
        }
        writer.write_region(&content)?;
    }

    report.regions_written = writer.regions_written();
    Ok(report)
}

/// Attach to `pid`, dump its committed memory to `config.output()` and detach.
///
/// The debug session is held for the whole dump; the process handle and the
/// image file are released before it detaches.
pub fn dump_process(pid: u32, config: &DumpConfig) -> Result<DumpReport> {
    let session = DebugSession::attach(pid)?;
    let process = ProcessHandle::open(pid)?;
    let mut writer = SparseImageWriter::create(config.output())?;

    let report = dump_regions(&process, config.range(), config.page_size(), &mut writer)?;
    let (bytes_written, logical_len) = (writer.bytes_written(), writer.logical_len());
    writer.finish()?;

    info!(
        "Wrote {} regions of PID {} to {} ({} bytes of content, {} byte image)",
        report.regions_written,
        session.pid(),
        config.output().display(),
        bytes_written,
        logical_len
    );
    Ok(report)
}
