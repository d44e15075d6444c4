//! Sensor Layer Error Types

use control_link::LinkError;
use pru_gateway::PruError;
use thiserror::Error;

/// Errors surfaced by the sensor layer
#[derive(Debug, Error)]
pub enum SensorError {
    /// Transport/unreachable-device error, surfaced unchanged from the
    /// command channel; not retried here.
    #[error("control channel error: {0}")]
    Channel(#[from] LinkError),

    /// PRU gateway failure; fatal to everything that depends on it
    #[error("PRU gateway error: {0}")]
    Gateway(#[from] PruError),

    /// A response lacked a field the reading needs
    #[error("missing field `{field}` in `{command}` response")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },

    /// A response field would not coerce to the expected number
    #[error("field `{field}` in `{command}` response is not numeric: `{value}`")]
    BadField {
        command: &'static str,
        field: String,
        value: String,
    },

    /// A response violated the firmware's layout contract
    #[error("malformed `{command}` response: {detail}")]
    Malformed {
        command: &'static str,
        detail: String,
    },

    /// Hardware fault reported by the drop sensors
    #[error("drop sensor read failed (left={left}, right={right})")]
    DropReadFailure { left: i32, right: i32 },
}
