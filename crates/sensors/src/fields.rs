//! Typed Field Extraction Helpers

use crate::error::SensorError;
use control_link::{Response, Value};

fn shown(value: &Value) -> String {
    value.fields().join(",")
}

/// Extract `field` from `response` as an unsigned integer.
pub(crate) fn scalar_u32(
    response: &Response,
    command: &'static str,
    field: &'static str,
) -> Result<u32, SensorError> {
    let value = response
        .get(field)
        .ok_or(SensorError::MissingField { command, field })?;
    value.to_u32().ok_or_else(|| SensorError::BadField {
        command,
        field: field.to_string(),
        value: shown(value),
    })
}

/// Extract `field` from `response` as a float.
pub(crate) fn scalar_f64(
    response: &Response,
    command: &'static str,
    field: &'static str,
) -> Result<f64, SensorError> {
    let value = response
        .get(field)
        .ok_or(SensorError::MissingField { command, field })?;
    value.to_f64().ok_or_else(|| SensorError::BadField {
        command,
        field: field.to_string(),
        value: shown(value),
    })
}
