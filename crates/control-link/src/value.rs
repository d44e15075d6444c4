//! Response Field Values

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A keyed command response: one entry per response line.
pub type Response = HashMap<String, Value>;

/// A single response field.
///
/// Depending on the command, a response line carries either one value
/// (`BatteryVoltageInmV,16000`) or an ordered sequence of values (the
/// per-angle tuples of a rangefinder scan).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Single-valued field
    Scalar(String),
    /// Multi-valued field, order as sent by the firmware
    List(Vec<String>),
}

impl Value {
    /// The field as a single string, if it is single-valued
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::List(_) => None,
        }
    }

    /// The field as an ordered slice of strings
    pub fn fields(&self) -> &[String] {
        match self {
            Value::Scalar(s) => std::slice::from_ref(s),
            Value::List(v) => v,
        }
    }

    /// Coerce a single-valued field to an unsigned integer
    pub fn to_u32(&self) -> Option<u32> {
        self.as_scalar()?.trim().parse().ok()
    }

    /// Coerce a single-valued field to a float
    pub fn to_f64(&self) -> Option<f64> {
        self.as_scalar()?.trim().parse().ok()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Value::List(v.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_coercion() {
        let v = Value::from("16000");
        assert_eq!(v.as_scalar(), Some("16000"));
        assert_eq!(v.to_u32(), Some(16000));
        assert_eq!(v.to_f64(), Some(16000.0));
    }

    #[test]
    fn test_non_numeric_scalar() {
        let v = Value::from("mV");
        assert_eq!(v.to_u32(), None);
    }

    #[test]
    fn test_list_fields() {
        let v = Value::from(vec!["1000", "40", "0", "0"]);
        assert_eq!(v.fields().len(), 4);
        assert_eq!(v.as_scalar(), None);
        assert_eq!(v.to_u32(), None);
    }

    #[test]
    fn test_scalar_fields_slice() {
        let v = Value::from("1");
        assert_eq!(v.fields(), ["1".to_string()]);
    }
}
