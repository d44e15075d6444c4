//! Analog Sensor Readers

use crate::error::SensorError;
use crate::fields;
use crate::lock;
use control_link::{cmd, ControlLink};
use std::sync::Mutex;
use std::time::Duration;
use tracing::error;

const BATTERY_VOLTAGE_KEY: &str = "BatteryVoltageInmV";
const CHARGE_VOLTAGE_KEY: &str = "ChargeVoltInmV";

/// Battery voltage at which charge reads 100%
const BATTERY_FULL_MV: f64 = 16000.0;

/// Charge voltage above which the dock is feeding the robot
const CHARGE_PRESENT_MV: u32 = 20000;

/// Raw digital-input source for the drop sensors.
///
/// Seam over the PRU gateway so hardware faults can be staged in tests. A
/// negative reading denotes a failed read.
pub trait DropSource {
    fn left_drop(&self) -> i32;
    fn right_drop(&self) -> i32;
}

impl DropSource for pru_gateway::Pru {
    fn left_drop(&self) -> i32 {
        pru_gateway::Pru::left_drop(self)
    }

    fn right_drop(&self) -> i32 {
        pru_gateway::Pru::right_drop(self)
    }
}

/// Stateless reader for the analog sensor block.
///
/// Create one per query and discard it freely; it owns no device resources.
/// Staleness is an input on every call, not stored state.
pub struct Analog<'a, L: ControlLink, G: DropSource> {
    link: &'a Mutex<L>,
    gateway: &'a G,
}

impl<'a, L: ControlLink, G: DropSource> Analog<'a, L, G> {
    pub fn new(link: &'a Mutex<L>, gateway: &'a G) -> Self {
        Self { link, gateway }
    }

    /// Battery voltage in millivolts, at most `max_age` old.
    pub fn battery_voltage(&self, max_age: Option<Duration>) -> Result<u32, SensorError> {
        let sensors = lock(self.link).query(cmd::GET_ANALOG_SENSORS, max_age)?;
        fields::scalar_u32(&sensors, cmd::GET_ANALOG_SENSORS, BATTERY_VOLTAGE_KEY)
    }

    /// Charging-rail voltage in millivolts, at most `max_age` old.
    pub fn charging(&self, max_age: Option<Duration>) -> Result<u32, SensorError> {
        let sensors = lock(self.link).query(cmd::GET_ANALOG_SENSORS, max_age)?;
        fields::scalar_u32(&sensors, cmd::GET_ANALOG_SENSORS, CHARGE_VOLTAGE_KEY)
    }

    /// Drop-sensor distances `(left, right)` in millimeters, read from the
    /// PRU gateway rather than the serial channel.
    ///
    /// A negative raw value on either side is a hardware fault and fails the
    /// whole read; a distance of zero is a valid reading.
    pub fn drop_distances(&self) -> Result<(u32, u32), SensorError> {
        let left = self.gateway.left_drop();
        let right = self.gateway.right_drop();

        if left < 0 || right < 0 {
            error!("drop sensor read failed (left={}, right={})", left, right);
            return Err(SensorError::DropReadFailure { left, right });
        }

        Ok((left as u32, right as u32))
    }
}

/// Battery charge as a percentage of the nominal full voltage, clamped to
/// 100.
pub fn battery_percent(voltage_mv: u32) -> f64 {
    (voltage_mv as f64 / BATTERY_FULL_MV * 100.0).min(100.0)
}

/// Whether the measured charge voltage means the dock is feeding power.
pub fn charge_present(voltage_mv: u32) -> bool {
    voltage_mv > CHARGE_PRESENT_MV
}
