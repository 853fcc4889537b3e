#![cfg_attr(not(target_os = "windows"), allow(dead_code, unused_variables))]

//! Access to the current process's own address space.
//!
//! Searches run over the live pages without copying them or going through a
//! cross-process read. Bytes are fetched with volatile reads through raw
//! pointers and never borrowed as a slice, since other threads may write to
//! them while a search runs. `view` returns an owned copy made the same way.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::process::{ModuleInfo, ModuleResolver, QueryRegion, ViewMemory};
use crate::region::MemoryRegion;
#[cfg(target_os = "windows")]
use crate::scan::pattern::find_pattern_raw;

#[cfg(target_os = "windows")]
use crate::process::win::{last_error, region_from_mbi, win32_code};
#[cfg(target_os = "windows")]
use windows::Win32::System::LibraryLoader::GetModuleHandleA;
#[cfg(target_os = "windows")]
use windows::Win32::System::Memory::{MEMORY_BASIC_INFORMATION, VirtualQuery};
#[cfg(target_os = "windows")]
use windows::Win32::System::ProcessStatus::{GetModuleInformation, MODULEINFO};
#[cfg(target_os = "windows")]
use windows::Win32::System::Threading::GetCurrentProcess;
#[cfg(target_os = "windows")]
use windows::core::PCSTR;

/// The calling process's address space.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMemory;

impl LocalMemory {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "windows")]
impl QueryRegion for LocalMemory {
    fn query_region(&self, address: u64) -> Result<MemoryRegion> {
        let mut mbi = MEMORY_BASIC_INFORMATION::default();
        // SAFETY: VirtualQuery fills at most size_of::<MEMORY_BASIC_INFORMATION>() bytes of
        // `mbi` and returns zero on failure.
        let written = unsafe {
            VirtualQuery(
                Some(address as *const _),
                &mut mbi,
                std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
            )
        };

        if written == 0 {
            return Err(Error::QueryFailed {
                address,
                code: last_error(),
            });
        }

        Ok(region_from_mbi(&mbi))
    }
}

/// Win32 `ERROR_NOACCESS`.
#[cfg(target_os = "windows")]
const ERROR_NOACCESS: u32 = 998;

#[cfg(target_os = "windows")]
fn region_len(region: &MemoryRegion) -> Result<usize> {
    usize::try_from(region.size).map_err(|_| Error::RegionTooLarge {
        address: region.start,
        size: region.size,
    })
}

#[cfg(target_os = "windows")]
impl ViewMemory for LocalMemory {
    fn view(&self, region: &MemoryRegion) -> Result<Cow<'_, [u8]>> {
        let len = region_len(region)?;
        if !region.protection.is_readable() || region.protection.is_guard() {
            return Err(Error::MemoryRead {
                address: region.start,
                code: ERROR_NOACCESS,
            });
        }

        let base = region.start as usize as *const u8;
        let bytes = (0..len)
            // SAFETY: VirtualQuery reported the region as readable and unguarded in this
            // process, and `i < len` keeps every read inside it. The caller must not free or
            // reprotect the region while the copy runs.
            .map(|i| unsafe { base.add(i).read_volatile() })
            .collect();
        Ok(Cow::Owned(bytes))
    }

    fn search(&self, region: &MemoryRegion, pattern: &[u8]) -> Result<Vec<usize>> {
        let len = region_len(region)?;
        // Execute-only pages pass the scan policy but fault on read.
        if !region.protection.is_readable() || region.protection.is_guard() {
            tracing::debug!(
                "Skipping unreadable region at {:#x} ({})",
                region.start,
                region.protection.short_name()
            );
            return Ok(Vec::new());
        }

        // SAFETY: as in `view`, the whole range is mapped readable and unguarded. Only raw
        // pointer reads touch it, so concurrent writes by other threads are not aliased by a
        // shared reference.
        Ok(unsafe { find_pattern_raw(region.start as usize as *const u8, len, pattern) })
    }
}

#[cfg(target_os = "windows")]
impl ModuleResolver for LocalMemory {
    fn resolve_module(&self, name: &str) -> Result<Option<ModuleInfo>> {
        let Ok(c_name) = std::ffi::CString::new(name) else {
            return Ok(None);
        };

        // SAFETY: c_name is a valid NUL-terminated string that outlives the call.
        let Ok(module) = (unsafe { GetModuleHandleA(PCSTR(c_name.as_ptr() as *const u8)) }) else {
            tracing::debug!("Module '{}' is not loaded", name);
            return Ok(None);
        };

        let mut info = MODULEINFO::default();
        // SAFETY: GetModuleInformation is called with the current process pseudo-handle and a
        // module handle from GetModuleHandleA. The info struct is properly sized.
        unsafe {
            GetModuleInformation(
                GetCurrentProcess(),
                module,
                &mut info,
                std::mem::size_of::<MODULEINFO>() as u32,
            )
        }
        .map_err(|e| Error::ModuleQuery {
            name: name.to_string(),
            code: win32_code(&e),
        })?;

        Ok(Some(ModuleInfo {
            name: name.to_string(),
            base: info.lpBaseOfDll as u64,
            size: info.SizeOfImage as u64,
        }))
    }
}

#[cfg(not(target_os = "windows"))]
const UNSUPPORTED: &str = "in-process memory access is only implemented on Windows";

#[cfg(not(target_os = "windows"))]
impl QueryRegion for LocalMemory {
    fn query_region(&self, _address: u64) -> Result<MemoryRegion> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}

#[cfg(not(target_os = "windows"))]
impl ViewMemory for LocalMemory {
    fn view(&self, _region: &MemoryRegion) -> Result<Cow<'_, [u8]>> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}

#[cfg(not(target_os = "windows"))]
impl ModuleResolver for LocalMemory {
    fn resolve_module(&self, _name: &str) -> Result<Option<ModuleInfo>> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}
