mod handle;
mod local;
pub mod provider;
mod remote;
mod session;
#[cfg(target_os = "windows")]
mod win;

// Synthetic address space for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use handle::ProcessHandle;
pub use local::LocalMemory;
pub use provider::{ModuleInfo, ModuleResolver, QueryRegion, ReadMemory, ReadOutcome, ViewMemory};
pub use remote::RemoteView;
pub use session::DebugSession;

// Re-export mock for convenient access in tests
#[doc(hidden)]
pub use mock::{MockAddressSpace, MockAddressSpaceBuilder};
