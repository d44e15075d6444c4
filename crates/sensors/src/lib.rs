//! Robot Sensor-Access Layer
//!
//! Normalized readings from the robot's onboard sensors, which the hardware
//! exposes only through the main board's line protocol and the PRU
//! co-processor:
//! - rotating laser distance sensor (scan parsing, angle normalization,
//!   spin-up synchronization)
//! - analog sensors (battery and charge voltages, drop distances)
//! - digital sensors (wheel extension switches)
//!
//! Construct one [`SensorContext`] at startup and hand it to every component
//! that needs sensor access.

pub mod analog;
pub mod context;
pub mod digital;
mod error;
mod fields;
pub mod lds;
pub mod scan;

pub use analog::{battery_percent, charge_present, Analog, DropSource};
pub use context::SensorContext;
pub use digital::Digital;
pub use error::SensorError;
pub use lds::Lds;
pub use scan::{LaserScan, ScanPoint};

use std::sync::{Mutex, MutexGuard};

/// Lock the shared channel, recovering a poisoned lock: the guarded state is
/// a serial handle plus a response cache, which stays usable after a
/// panicked holder.
pub(crate) fn lock<L>(link: &Mutex<L>) -> MutexGuard<'_, L> {
    link.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
