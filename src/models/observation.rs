use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::constants::TIMESTAMP_FORMAT;

/// The most recent reported value of one station. Numeric when the raw
/// observation parses as a float, otherwise the literal text (some
/// quantities report categories such as "regn").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Numeric(f64),
    Text(String),
}

impl ObservationValue {
    /// Numeric parse first, text fallback. Never both.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(v) => ObservationValue::Numeric(v),
            Err(_) => ObservationValue::Text(raw.to_string()),
        }
    }

    pub fn as_json(&self) -> serde_json::Value {
        match self {
            ObservationValue::Numeric(v) => serde_json::json!(v),
            ObservationValue::Text(s) => serde_json::json!(s),
        }
    }
}

/// One accepted per-station observation, produced transiently during a
/// fetch and handed to the feature assembler by value.
#[derive(Debug, Clone, Validate)]
pub struct StationObservation {
    #[validate(length(min = 1))]
    pub station_name: String,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    pub height_meters: f64,

    /// Station update time, epoch milliseconds.
    pub updated_epoch_millis: i64,

    pub value: ObservationValue,
}

impl StationObservation {
    /// UTC render of `updated_epoch_millis`, e.g. "2020-06-21 09:40:00.000".
    pub fn formatted_timestamp(&self) -> String {
        let secs = self.updated_epoch_millis.div_euclid(1000);
        let millis = self.updated_epoch_millis.rem_euclid(1000) as u32;
        match Utc.timestamp_opt(secs, millis * 1_000_000).single() {
            Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
            None => String::new(),
        }
    }
}
