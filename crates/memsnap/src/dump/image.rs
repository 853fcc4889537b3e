//! Sparse process image output.
//!
//! Every region is written at the file offset equal to its virtual start
//! address. Gaps between regions are never written, so the file's logical
//! length is the highest address written while its allocated size tracks only
//! the captured bytes.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use super::RegionContent;
use crate::diag::format_address;
use crate::error::Result;

/// Writer that places region bytes at their virtual addresses.
pub struct SparseImageWriter<W: Write + Seek> {
    inner: W,
    regions_written: usize,
    bytes_written: u64,
    logical_len: u64,
}

impl SparseImageWriter<BufWriter<File>> {
    /// Create (or truncate) the image file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        mark_sparse(&file);
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> SparseImageWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            regions_written: 0,
            bytes_written: 0,
            logical_len: 0,
        }
    }

    /// Write `content` at offset `content.region.start`.
    pub fn write_region(&mut self, content: &RegionContent) -> Result<()> {
        let start = content.region.start;
        debug!(
            "Writing {} bytes at 0x{}",
            content.bytes.len(),
            format_address(start)
        );

        self.inner.seek(SeekFrom::Start(start))?;
        self.inner.write_all(&content.bytes)?;

        self.regions_written += 1;
        self.bytes_written += content.bytes.len() as u64;
        self.logical_len = self
            .logical_len
            .max(start.saturating_add(content.bytes.len() as u64));
        Ok(())
    }

    pub fn regions_written(&self) -> usize {
        self.regions_written
    }

    /// Total bytes written so far (the packed size of the image).
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Highest end offset written so far (the flat size of the image).
    pub fn logical_len(&self) -> u64 {
        self.logical_len
    }

    /// Flush buffered output and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Ask the filesystem to store unwritten ranges of `file` as holes.
///
/// NTFS only allocates holes for files flagged sparse; failure leaves a valid
/// image that just occupies more disk space.
#[cfg(target_os = "windows")]
fn mark_sparse(file: &File) {
    use std::os::windows::io::AsRawHandle;
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::System::IO::DeviceIoControl;
    use windows::Win32::System::Ioctl::FSCTL_SET_SPARSE;

    let mut returned = 0u32;
    // SAFETY: the handle belongs to `file`, which outlives the call. FSCTL_SET_SPARSE takes no
    // input or output buffers.
    let result = unsafe {
        DeviceIoControl(
            HANDLE(file.as_raw_handle()),
            FSCTL_SET_SPARSE,
            None,
            0,
            None,
            0,
            Some(&mut returned),
            None,
        )
    };

    if let Err(e) = result {
        tracing::warn!("Failed to mark image file as sparse: {}", e);
    }
}

/// Unix filesystems create holes for unwritten ranges without being asked.
#[cfg(not(target_os = "windows"))]
fn mark_sparse(_file: &File) {}
