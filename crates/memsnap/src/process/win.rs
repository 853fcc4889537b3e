//! Shared helpers for the Windows implementations.

use windows::Win32::Foundation::GetLastError;
use windows::Win32::System::Memory::MEMORY_BASIC_INFORMATION;

use crate::region::{MemoryRegion, Protection, RegionKind, RegionState};

/// `ERROR_PARTIAL_COPY`
pub(crate) const ERROR_PARTIAL_COPY: u32 = 299;

/// Win32 error code carried by a `windows::core::Error`.
///
/// Errors raised from `GetLastError` are wrapped as `HRESULT_FROM_WIN32`
/// (facility 7); anything else is reported as the raw HRESULT bits.
pub(crate) fn win32_code(error: &windows::core::Error) -> u32 {
    let hresult = error.code().0 as u32;
    if hresult & 0xFFFF_0000 == 0x8007_0000 {
        hresult & 0xFFFF
    } else {
        hresult
    }
}

/// Thread's last Win32 error, for APIs that signal failure through a return value.
pub(crate) fn last_error() -> u32 {
    // SAFETY: GetLastError only reads thread-local state.
    unsafe { GetLastError() }.0
}

pub(crate) fn region_from_mbi(mbi: &MEMORY_BASIC_INFORMATION) -> MemoryRegion {
    MemoryRegion {
        start: mbi.BaseAddress as u64,
        size: mbi.RegionSize as u64,
        state: RegionState::from_raw(mbi.State.0),
        protection: Protection::from_bits_retain(mbi.Protect.0),
        kind: RegionKind::from_raw(mbi.Type.0),
    }
}
