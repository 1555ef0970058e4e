//! The five physiological measurements the risk model consumes.
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Number of input features the pipeline was fitted on.
pub const N_FEATURES: usize = 5;

/// Column names in the order the pipeline expects them.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "HeartRate",
    "BodyTemp",
    "BloodOxygen",
    "ContractionFreq",
    "ContractionIntensity",
];

/// One patient reading.
///
/// Field names on the wire match [`FEATURE_NAMES`]. All fields are required.
/// Each must be a number or a string holding a finite number (`"80"`); no
/// physiological range checks are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFeatures {
    #[serde(rename = "HeartRate", deserialize_with = "lenient_f64")]
    pub heart_rate: f64,
    #[serde(rename = "BodyTemp", deserialize_with = "lenient_f64")]
    pub body_temp: f64,
    #[serde(rename = "BloodOxygen", deserialize_with = "lenient_f64")]
    pub blood_oxygen: f64,
    #[serde(rename = "ContractionFreq", deserialize_with = "lenient_f64")]
    pub contraction_freq: f64,
    #[serde(rename = "ContractionIntensity", deserialize_with = "lenient_f64")]
    pub contraction_intensity: f64,
}

struct LenientF64;

impl<'de> Visitor<'de> for LenientF64 {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => Ok(parsed),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LenientF64)
}

impl RiskFeatures {
    /// Feature vector in the fixed training order.
    pub fn to_row(&self) -> [f64; N_FEATURES] {
        [
            self.heart_rate,
            self.body_temp,
            self.blood_oxygen,
            self.contraction_freq,
            self.contraction_intensity,
        ]
    }
}
