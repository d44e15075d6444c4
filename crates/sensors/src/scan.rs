//! Rangefinder Scan Parsing and Angle Normalization

use crate::error::SensorError;
use crate::fields;
use control_link::{cmd, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Response key carrying the current rotation speed
pub(crate) const ROTATION_SPEED_KEY: &str = "ROTATION_SPEED";

/// Help line the firmware piggybacks on every scan response
const HELP_KEY: &str = "AngleInDegrees";

/// Raw angle slots on the device
const ANGLE_SLOTS: u16 = 360;

/// Fields per angle entry; the layout is a bit-exact firmware contract
const SCAN_FIELDS: usize = 4;

/// One retained range measurement.
///
/// Field order matches the firmware's per-angle tuple
/// `[distance_mm, signal_strength, quality, error_code]`. Retained points
/// always carry an error code of zero; erroneous readings are dropped
/// during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPoint {
    pub distance_mm: u32,
    pub signal_strength: u32,
    pub quality: u32,
    pub error_code: u32,
}

/// One full or partial scan, keyed by angle in degrees (0-359), where 0
/// points directly ahead of the robot.
///
/// A scan with no points is a legitimate result: it means the device has
/// not produced valid data yet (spin-up, signal interference).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserScan {
    pub points: BTreeMap<u16, ScanPoint>,
}

impl LaserScan {
    /// Number of angles with a valid reading
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The reading at `angle` degrees, if that slot was valid
    pub fn get(&self, angle: u16) -> Option<&ScanPoint> {
        self.points.get(&angle)
    }
}

/// A parsed scan with the rotation speed still attached; the speed is
/// consumed by spin-up and rotation-speed queries and stripped before a
/// scan reaches the caller.
#[derive(Debug, Clone)]
pub(crate) struct ParsedScan {
    pub scan: LaserScan,
    pub rotation_speed: f64,
}

/// Rotate the device's native zero reference, which points "up", onto the
/// robot's forward axis.
fn normalize_angle(raw: u16) -> u16 {
    let real = raw + 90;
    if real > 359 {
        real - 359
    } else {
        real
    }
}

/// Parse one raw `GetLDSScan` response.
///
/// Entries with a nonzero error code are dropped, logged at debug level and
/// reported through `on_error(raw_angle, error_code)`; a partial or even
/// empty result is normal, never an error. Responses that violate the
/// firmware layout (non-angle keys, wrong field counts, non-numeric fields)
/// do fail the parse.
pub(crate) fn parse_scan(
    raw: &Response,
    mut on_error: impl FnMut(u16, u32),
) -> Result<ParsedScan, SensorError> {
    let rotation_speed = fields::scalar_f64(raw, cmd::GET_LDS_SCAN, ROTATION_SPEED_KEY)?;

    let mut scan = LaserScan::default();
    for (key, value) in raw {
        if key == ROTATION_SPEED_KEY || key == HELP_KEY {
            continue;
        }

        let angle: u16 = key
            .parse()
            .ok()
            .filter(|a| *a < ANGLE_SLOTS)
            .ok_or_else(|| SensorError::Malformed {
                command: cmd::GET_LDS_SCAN,
                detail: format!("bad angle key `{key}`"),
            })?;

        let text = value.fields();
        if text.len() != SCAN_FIELDS {
            return Err(SensorError::Malformed {
                command: cmd::GET_LDS_SCAN,
                detail: format!(
                    "angle {angle} carries {} fields, expected {SCAN_FIELDS}",
                    text.len()
                ),
            });
        }

        let mut nums = [0u32; SCAN_FIELDS];
        for (slot, field) in nums.iter_mut().zip(text) {
            *slot = field.trim().parse().map_err(|_| SensorError::BadField {
                command: cmd::GET_LDS_SCAN,
                field: key.clone(),
                value: field.clone(),
            })?;
        }

        let error_code = nums[SCAN_FIELDS - 1];
        if error_code != 0 {
            debug!("error {} in LDS reading for angle {}", error_code, angle);
            on_error(angle, error_code);
            continue;
        }

        scan.points.insert(
            normalize_angle(angle),
            ScanPoint {
                distance_mm: nums[0],
                signal_strength: nums[1],
                quality: nums[2],
                error_code,
            },
        );
    }

    Ok(ParsedScan {
        scan,
        rotation_speed,
    })
}
