#![cfg_attr(not(target_os = "windows"), allow(dead_code, unused_variables))]

use crate::error::{Error, Result};
use crate::process::{ModuleInfo, ModuleResolver, QueryRegion, ReadMemory, ReadOutcome};
use crate::region::MemoryRegion;

#[cfg(target_os = "windows")]
use tracing::warn;

#[cfg(target_os = "windows")]
use crate::process::win::{ERROR_PARTIAL_COPY, last_error, region_from_mbi, win32_code};
#[cfg(target_os = "windows")]
use windows::Win32::Foundation::{CloseHandle, HANDLE, HMODULE};
#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
#[cfg(target_os = "windows")]
use windows::Win32::System::Memory::{MEMORY_BASIC_INFORMATION, VirtualQueryEx};
#[cfg(target_os = "windows")]
use windows::Win32::System::ProcessStatus::{
    EnumProcessModulesEx, GetModuleBaseNameW, GetModuleInformation, LIST_MODULES_ALL, MODULEINFO,
};
#[cfg(target_os = "windows")]
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

/// Open handle to a target process, closed on drop.
#[cfg(target_os = "windows")]
pub struct ProcessHandle {
    handle: HANDLE,
    pub pid: u32,
}

#[cfg(not(target_os = "windows"))]
pub struct ProcessHandle {
    pub pid: u32,
}

#[cfg(target_os = "windows")]
impl ProcessHandle {
    pub fn open(pid: u32) -> Result<Self> {
        // SAFETY: OpenProcess is called with valid access flags. The returned handle is owned
        // by this struct and closed in Drop.
        let handle = unsafe {
            OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid).map_err(|e| {
                tracing::debug!("OpenProcess failed for PID {}: {}", pid, e);
                Error::ProcessOpen {
                    pid,
                    code: win32_code(&e),
                }
            })?
        };

        Ok(Self { handle, pid })
    }

    pub fn handle(&self) -> HANDLE {
        self.handle
    }

    fn modules(&self) -> Result<Vec<HMODULE>> {
        let mut modules = vec![HMODULE::default(); 1024];

        loop {
            let mut needed: u32 = 0;
            let capacity = (modules.len() * std::mem::size_of::<HMODULE>()) as u32;

            // SAFETY: EnumProcessModulesEx is called with a valid process handle and a buffer
            // whose byte length is passed as `capacity`. `needed` receives the required size.
            unsafe {
                EnumProcessModulesEx(
                    self.handle,
                    modules.as_mut_ptr(),
                    capacity,
                    &mut needed,
                    LIST_MODULES_ALL,
                )
            }
            .map_err(|e| Error::ModuleQuery {
                name: String::from("*"),
                code: win32_code(&e),
            })?;

            let count = needed as usize / std::mem::size_of::<HMODULE>();
            if needed <= capacity {
                modules.truncate(count);
                return Ok(modules);
            }
            modules.resize(count, HMODULE::default());
        }
    }

    fn module_name(&self, module: HMODULE) -> String {
        let mut buffer = [0u16; 260];
        // SAFETY: GetModuleBaseNameW writes at most buffer.len() UTF-16 units into the buffer
        // and returns the number written.
        let len = unsafe { GetModuleBaseNameW(self.handle, module, &mut buffer) } as usize;
        String::from_utf16_lossy(&buffer[..len.min(buffer.len())])
    }
}

#[cfg(target_os = "windows")]
impl QueryRegion for ProcessHandle {
    fn query_region(&self, address: u64) -> Result<MemoryRegion> {
        let mut mbi = MEMORY_BASIC_INFORMATION::default();
        // SAFETY: VirtualQueryEx fills at most size_of::<MEMORY_BASIC_INFORMATION>() bytes of
        // `mbi` and returns zero on failure.
        let written = unsafe {
            VirtualQueryEx(
                self.handle,
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

#[cfg(target_os = "windows")]
impl ReadMemory for ProcessHandle {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<ReadOutcome> {
        let mut bytes_read = 0;

        // SAFETY: ReadProcessMemory is called with:
        // - A valid process handle (obtained via OpenProcess with PROCESS_VM_READ)
        // - A destination buffer of exactly buf.len() bytes
        // - A pointer to receive the actual bytes read
        // Failure, including a partial copy, is reported through the Result.
        let result = unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const _,
                buf.as_mut_ptr() as *mut _,
                buf.len(),
                Some(&mut bytes_read),
            )
        };

        match result {
            Ok(()) if bytes_read >= buf.len() => Ok(ReadOutcome::Complete),
            Ok(()) => Ok(ReadOutcome::PartialCopy { bytes_read }),
            Err(e) => match win32_code(&e) {
                ERROR_PARTIAL_COPY => Ok(ReadOutcome::PartialCopy { bytes_read }),
                code => Err(Error::MemoryRead { address, code }),
            },
        }
    }
}

#[cfg(target_os = "windows")]
impl ModuleResolver for ProcessHandle {
    fn resolve_module(&self, name: &str) -> Result<Option<ModuleInfo>> {
        for module in self.modules()? {
            let module_name = self.module_name(module);
            if !module_name.eq_ignore_ascii_case(name) {
                continue;
            }

            let mut info = MODULEINFO::default();
            // SAFETY: GetModuleInformation is called with a valid process handle and a module
            // handle from the enumeration. The info struct is properly sized.
            unsafe {
                GetModuleInformation(
                    self.handle,
                    module,
                    &mut info,
                    std::mem::size_of::<MODULEINFO>() as u32,
                )
            }
            .map_err(|e| Error::ModuleQuery {
                name: name.to_string(),
                code: win32_code(&e),
            })?;

            return Ok(Some(ModuleInfo {
                name: module_name,
                base: info.lpBaseOfDll as u64,
                size: info.SizeOfImage as u64,
            }));
        }

        Ok(None)
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if !self.handle.is_invalid() {
            // SAFETY: self.handle is a valid handle obtained from OpenProcess and has not been
            // closed yet.
            if let Err(e) = unsafe { CloseHandle(self.handle) } {
                warn!("Failed to close process handle: {}", e);
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
const UNSUPPORTED: &str = "process memory access is only implemented on Windows";

#[cfg(not(target_os = "windows"))]
impl ProcessHandle {
    pub fn open(_pid: u32) -> Result<Self> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}

#[cfg(not(target_os = "windows"))]
impl QueryRegion for ProcessHandle {
    fn query_region(&self, _address: u64) -> Result<MemoryRegion> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}

#[cfg(not(target_os = "windows"))]
impl ReadMemory for ProcessHandle {
    fn read_into(&self, _address: u64, _buf: &mut [u8]) -> Result<ReadOutcome> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}

#[cfg(not(target_os = "windows"))]
impl ModuleResolver for ProcessHandle {
    fn resolve_module(&self, _name: &str) -> Result<Option<ModuleInfo>> {
        Err(Error::Unsupported(UNSUPPORTED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_open_unsupported() {
        assert!(matches!(
            ProcessHandle::open(1234),
            Err(Error::Unsupported(_))
        ));
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_open_current_process_and_query() {
        let process = ProcessHandle::open(std::process::id()).unwrap();
        let probe = test_open_current_process_and_query as usize as u64;

        let region = process.query_region(probe).unwrap();
        assert!(region.contains(probe));
        assert!(region.protection.is_accessible());
    }
}
