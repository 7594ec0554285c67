//! Device abstraction the CLI redirects.
//!
//! A device delivers "bytes ready" notifications to whatever receive hook is
//! currently installed, usually from interrupt context. The CLI never owns a
//! device; it borrows the hook slot for the length of a session.

use alloc::sync::Arc;

/// Shared handle to a device
pub type DeviceRef = Arc<dyn Device>;

/// Receive-indication hook slot. `None` means nobody is listening.
pub type RxHook = Option<Arc<dyn RxIndicate>>;

/// Character device as seen by the AT CLI
pub trait Device: Send + Sync {
    /// Human readable device name
    fn name(&self) -> &str;

    /// Read up to `buf.len()` bytes, returning how many were read
    fn read(&self, offset: usize, buf: &mut [u8]) -> usize;

    /// Currently installed receive hook
    fn rx_indicate(&self) -> RxHook;

    /// Install `hook` and return the one it replaces
    fn set_rx_indicate(&self, hook: RxHook) -> RxHook;
}

/// Receive-indication callback.
///
/// Called by the device, possibly from interrupt context, when `size` bytes
/// can be read from it. Implementations must not block or allocate.
pub trait RxIndicate: Send + Sync {
    fn indicate(&self, device: &dyn Device, size: usize);

    /// True for hooks installed by an AT CLI session
    fn is_relay(&self) -> bool {
        false
    }
}

/// Compare two hook slots by identity
pub fn same_hook(a: &RxHook, b: &RxHook) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// Compare two device handles by identity
pub fn same_device(a: &DeviceRef, b: &DeviceRef) -> bool {
    Arc::ptr_eq(a, b)
}
