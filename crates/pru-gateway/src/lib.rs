//! PRU Digital-I/O Gateway
//!
//! The drop sensors are wired to the board's PRU co-processor, outside the
//! main board's serial protocol. This crate provides safe wrappers around
//! the PRU userspace library: a process-wide idempotent [`init`] and raw
//! per-side drop-distance reads, where a negative value denotes a hardware
//! read failure (escalated by the sensor layer, not here).
//!
//! Built without the `ffi` feature, an in-process mock stands in for the
//! library so the rest of the stack tests without hardware.

use std::sync::OnceLock;
use thiserror::Error;
use tracing::{error, info};

/// Gateway errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PruError {
    /// The PRU subsystem could not be brought up; no sensor functionality
    /// that depends on it can proceed.
    #[error("PRU initialization failed")]
    Init,

    /// A handle was requested before a successful [`init`].
    #[error("PRU subsystem not initialized")]
    NotInitialized,
}

// Extern functions from the PRU userspace library.
// pru_init returns nonzero on success; the drop reads return a distance in
// millimeters or a negative value on failure.
#[cfg(feature = "ffi")]
extern "C" {
    fn pru_init() -> std::os::raw::c_int;
    fn pru_get_left_drop() -> std::os::raw::c_int;
    fn pru_get_right_drop() -> std::os::raw::c_int;
}

// Mock implementations for when the PRU library is not available
#[cfg(not(feature = "ffi"))]
mod mock_ffi {
    use std::os::raw::c_int;
    use std::sync::atomic::{AtomicBool, Ordering};

    static MOCK_INITIALIZED: AtomicBool = AtomicBool::new(false);

    const MOCK_LEFT_DROP: c_int = 18;
    const MOCK_RIGHT_DROP: c_int = 21;

    pub unsafe fn pru_init() -> c_int {
        MOCK_INITIALIZED.store(true, Ordering::SeqCst);
        1
    }

    pub unsafe fn pru_get_left_drop() -> c_int {
        if MOCK_INITIALIZED.load(Ordering::SeqCst) {
            MOCK_LEFT_DROP
        } else {
            -1
        }
    }

    pub unsafe fn pru_get_right_drop() -> c_int {
        if MOCK_INITIALIZED.load(Ordering::SeqCst) {
            MOCK_RIGHT_DROP
        } else {
            -1
        }
    }
}

#[cfg(not(feature = "ffi"))]
use mock_ffi::*;

static INIT: OnceLock<bool> = OnceLock::new();

/// Bring up the PRU subsystem.
///
/// Idempotent and safe to call from several sensor-layer consumers sharing
/// one process: the underlying `pru_init()` fires at most once, and its
/// outcome (success or failure) is remembered for every later call.
pub fn init() -> Result<(), PruError> {
    let ok = *INIT.get_or_init(|| {
        if unsafe { pru_init() } != 0 {
            info!("PRU subsystem initialized");
            true
        } else {
            error!("PRU initialization failed");
            false
        }
    });

    if ok {
        Ok(())
    } else {
        Err(PruError::Init)
    }
}

/// Whether a successful [`init`] has happened in this process.
pub fn is_initialized() -> bool {
    INIT.get().copied().unwrap_or(false)
}

/// Handle for PRU digital-input reads, obtainable only after a successful
/// [`init`].
#[derive(Debug, Clone, Copy)]
pub struct Pru {
    _private: (),
}

impl Pru {
    /// Get a read handle. Fails if [`init`] has not succeeded.
    pub fn new() -> Result<Self, PruError> {
        if is_initialized() {
            Ok(Self { _private: () })
        } else {
            Err(PruError::NotInitialized)
        }
    }

    /// Raw left drop-sensor distance; negative denotes a read failure.
    pub fn left_drop(&self) -> i32 {
        unsafe { pru_get_left_drop() }
    }

    /// Raw right drop-sensor distance; negative denotes a read failure.
    pub fn right_drop(&self) -> i32 {
        unsafe { pru_get_right_drop() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init().is_ok());
        assert!(init().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_reads_after_init() {
        init().unwrap();
        let pru = Pru::new().unwrap();
        assert!(pru.left_drop() >= 0);
        assert!(pru.right_drop() >= 0);
    }
}
