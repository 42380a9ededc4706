//! Common types used in the protocol.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// A 2-byte sensor identifier, conventionally displayed as 4 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub [u8; 2]);

impl DeviceId {
    /// Create a new device id from bytes.
    pub fn new(bytes: [u8; 2]) -> Self {
        DeviceId(bytes)
    }

    /// Create from a slice. Returns None if the slice is shorter than 2 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() >= 2 {
            Some(DeviceId([slice[0], slice[1]]))
        } else {
            None
        }
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    /// Get the bytes as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DeviceId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ProtocolError::InvalidDeviceId(s.to_string()))?;
        if bytes.len() != 2 {
            return Err(ProtocolError::InvalidDeviceId(s.to_string()));
        }
        Ok(DeviceId([bytes[0], bytes[1]]))
    }
}

/// Qualitative air-quality band derived from a PM measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    VeryGood,
    Good,
    Moderate,
    Acceptable,
    Bad,
    VeryBad,
}

/// Upper bounds of the PM10 grade bands, in µg/m³.
const PM10_LIMITS: [f64; 6] = [20.0, 60.0, 100.0, 140.0, 200.0, f64::INFINITY];
/// Upper bounds of the PM2.5 grade bands, in µg/m³.
const PM25_LIMITS: [f64; 6] = [12.0, 36.0, 60.0, 84.0, 120.0, f64::INFINITY];

const GRADES: [Grade; 6] = [
    Grade::VeryGood,
    Grade::Good,
    Grade::Moderate,
    Grade::Acceptable,
    Grade::Bad,
    Grade::VeryBad,
];

impl Grade {
    /// Grade a PM10 value.
    pub fn for_pm10(value: f64) -> Grade {
        Self::scale(value, &PM10_LIMITS)
    }

    /// Grade a PM2.5 value.
    pub fn for_pm25(value: f64) -> Grade {
        Self::scale(value, &PM25_LIMITS)
    }

    /// First band whose upper bound strictly exceeds the value.
    fn scale(value: f64, limits: &[f64; 6]) -> Grade {
        for (i, limit) in limits.iter().enumerate() {
            if value < *limit {
                return GRADES[i];
            }
        }
        Grade::VeryBad
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::VeryGood => "very good",
            Grade::Good => "good",
            Grade::Moderate => "moderate",
            Grade::Acceptable => "acceptable",
            Grade::Bad => "bad",
            Grade::VeryBad => "very bad",
        };
        f.write_str(s)
    }
}
