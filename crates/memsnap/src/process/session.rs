#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

use crate::error::{Error, Result};

#[cfg(target_os = "windows")]
use crate::diag::format_os_failure;
#[cfg(target_os = "windows")]
use crate::process::win::win32_code;
#[cfg(target_os = "windows")]
use windows::Win32::System::Diagnostics::Debug::{DebugActiveProcess, DebugActiveProcessStop};

/// Debugger attachment to a process, detached exactly once on drop.
///
/// Attaching suspends the target while the dump runs. A failed detach is
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct DebugSession {
    pid: u32,
}

impl DebugSession {
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[cfg(target_os = "windows")]
impl DebugSession {
    pub fn attach(pid: u32) -> Result<Self> {
        // SAFETY: DebugActiveProcess takes a plain process id; failure is reported through the
        // Result.
        unsafe { DebugActiveProcess(pid) }.map_err(|e| Error::Attach {
            pid,
            code: win32_code(&e),
        })?;
        tracing::debug!("Attached debugger to PID {}", pid);
        Ok(Self { pid })
    }
}

#[cfg(target_os = "windows")]
impl Drop for DebugSession {
    fn drop(&mut self) {
        // SAFETY: this session attached to self.pid in `attach` and has not detached yet.
        match unsafe { DebugActiveProcessStop(self.pid) } {
            Ok(()) => tracing::debug!("Detached debugger from PID {}", self.pid),
            Err(e) => tracing::error!(
                "{}",
                format_os_failure("DebugActiveProcessStop", win32_code(&e))
            ),
        }
    }
}

#[cfg(not(target_os = "windows"))]
impl DebugSession {
    pub fn attach(_pid: u32) -> Result<Self> {
        Err(Error::Unsupported(
            "debugger attachment is only implemented on Windows",
        ))
    }
}
