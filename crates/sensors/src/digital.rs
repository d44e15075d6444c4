//! Digital Sensor Reader

use crate::error::SensorError;
use crate::fields;
use crate::lock;
use control_link::{cmd, ControlLink};
use std::sync::Mutex;
use std::time::Duration;

const LEFT_WHEEL_KEY: &str = "SNSR_LEFT_WHEEL_EXTENDED";
const RIGHT_WHEEL_KEY: &str = "SNSR_RIGHT_WHEEL_EXTENDED";

/// Stateless reader for the digital sensor block. Flags come back as
/// integers and are converted by truthiness.
pub struct Digital<'a, L: ControlLink> {
    link: &'a Mutex<L>,
}

impl<'a, L: ControlLink> Digital<'a, L> {
    pub fn new(link: &'a Mutex<L>) -> Self {
        Self { link }
    }

    /// Whether the `(left, right)` wheels are extended, at most `max_age`
    /// old. Channel errors propagate unchanged; no retry here.
    pub fn wheels_extended(&self, max_age: Option<Duration>) -> Result<(bool, bool), SensorError> {
        let sensors = lock(self.link).query(cmd::GET_DIGITAL_SENSORS, max_age)?;
        let left = fields::scalar_u32(&sensors, cmd::GET_DIGITAL_SENSORS, LEFT_WHEEL_KEY)? != 0;
        let right = fields::scalar_u32(&sensors, cmd::GET_DIGITAL_SENSORS, RIGHT_WHEEL_KEY)? != 0;
        Ok((left, right))
    }
}
