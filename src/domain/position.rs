//! Position payload as returned by the upstream API, and its validated form.

use crate::domain::errors::PollError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Upstream body before validation.
///
/// The three coordinates are kept untyped and optional so that validation
/// can decide what counts as present. Other fields (`id`, `velocity`,
/// `visibility`, `timestamp`, ...) are not validated but are kept in
/// `extra` so a rejected payload is reported as it was received.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A fully validated coordinate triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionReading {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl fmt::Display for PositionReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat={:.4} lon={:.4} alt={:.2}",
            self.latitude, self.longitude, self.altitude
        )
    }
}

/// How strictly a coordinate must be present to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Every coordinate must be truthy. A coordinate of exactly `0` is
    /// rejected as missing.
    #[default]
    Truthy,
    /// Any non-null coordinate that coerces to a number is accepted,
    /// including `0`.
    PresenceOnly,
}

impl FromStr for ValidationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truthy" => Ok(ValidationPolicy::Truthy),
            "presence" | "presence_only" => Ok(ValidationPolicy::PresenceOnly),
            _ => anyhow::bail!(
                "Invalid POSITION_VALIDATION: {}. Must be 'truthy' or 'presence'",
                s
            ),
        }
    }
}

impl RawPosition {
    /// Validate all three coordinates and coerce them to `f64`.
    ///
    /// Either every coordinate passes or a `PollError::Validation` carrying
    /// the raw payload is returned.
    pub fn validate(&self, policy: ValidationPolicy) -> Result<PositionReading, PollError> {
        let latitude = self.coordinate("latitude", &self.latitude, policy)?;
        let longitude = self.coordinate("longitude", &self.longitude, policy)?;
        let altitude = self.coordinate("altitude", &self.altitude, policy)?;

        Ok(PositionReading {
            latitude,
            longitude,
            altitude,
        })
    }

    fn coordinate(
        &self,
        field: &str,
        value: &Option<Value>,
        policy: ValidationPolicy,
    ) -> Result<f64, PollError> {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => return Err(self.invalid(format!("{} is missing", field))),
        };

        if policy == ValidationPolicy::Truthy && !is_truthy(value) {
            return Err(self.invalid(format!("{} is falsy ({})", field, value)));
        }

        coerce_number(value)
            .ok_or_else(|| self.invalid(format!("{} is not numeric ({})", field, value)))
    }

    fn invalid(&self, reason: String) -> PollError {
        PollError::Validation {
            reason,
            payload: serde_json::to_value(self).unwrap_or(Value::Null),
        }
    }
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion of a JSON value. Returns `None` where the result would
/// not be a number.
///
/// Strings accept decimal, `0x`/`0o`/`0b` integer literals and the exact
/// spellings `Infinity`, `+Infinity`, `-Infinity`; blank strings are `0`.
/// An empty array is `0` and a one-element array coerces its element.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => parse_numeric_str(s)?,
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [Value::Null] => 0.0,
            [inner @ (Value::Number(_) | Value::String(_) | Value::Array(_))] => {
                coerce_number(inner)?
            }
            _ => return None,
        },
        Value::Null | Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
    }

    // `f64::from_str` also takes "inf", "nan" and "infinity" in any case.
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
