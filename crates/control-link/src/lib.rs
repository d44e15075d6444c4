//! Command/Response Channel to the Robot Main Board
//!
//! The main board exposes every sensor behind a line-oriented text protocol:
//! a named command goes out, a block of comma-separated lines comes back.
//! This crate provides the channel abstraction ([`ControlLink`]), a serial
//! implementation with a staleness-aware response cache ([`SerialLink`]),
//! and a scripted mock for hardware-free tests ([`MockLink`]).

mod cache;
mod error;
mod link;
mod mock;
mod serial;
mod value;

pub use error::LinkError;
pub use link::ControlLink;
pub use mock::MockLink;
pub use serial::{LinkConfig, SerialLink};
pub use value::{Response, Value};

/// Command names understood by the main board firmware.
///
/// These strings are a bit-exact contract with the firmware and must not be
/// altered.
pub mod cmd {
    /// Start the laser distance sensor rotating
    pub const SET_LDS_ROTATION_ON: &str = "SetLDSRotation on";
    /// Stop the laser distance sensor
    pub const SET_LDS_ROTATION_OFF: &str = "SetLDSRotation off";
    /// One full rangefinder scan
    pub const GET_LDS_SCAN: &str = "GetLDSScan";
    /// Motor status block (includes laser supply voltage)
    pub const GET_MOTORS: &str = "GetMotors";
    /// Analog sensor block (battery, charge, wall sensors)
    pub const GET_ANALOG_SENSORS: &str = "GetAnalogSensors";
    /// Digital sensor block (wheel extension, bumpers)
    pub const GET_DIGITAL_SENSORS: &str = "GetDigitalSensors";
}
