//! Responses received from the sensor.

use chrono::{DateTime, Utc};

use crate::constants::*;
use crate::types::{DeviceId, Grade};

/// A decoded particulate-matter measurement from a command/response frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// When the frame was decoded.
    pub timestamp: DateTime<Utc>,
    /// PM10 concentration in µg/m³, one decimal place.
    pub pm10: f64,
    /// PM2.5 concentration in µg/m³, one decimal place.
    pub pm25: f64,
    /// Reporting sensor's id.
    pub device_id: DeviceId,
}

impl Readout {
    /// Qualitative grade of the PM10 value.
    pub fn pm10_grade(&self) -> Grade {
        Grade::for_pm10(self.pm10)
    }

    /// Qualitative grade of the PM2.5 value.
    pub fn pm25_grade(&self) -> Grade {
        Grade::for_pm25(self.pm25)
    }
}

/// A measurement decoded from a continuous-streaming payload.
///
/// The streaming layout carries no type or checksum byte, so only the two
/// PM values are decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// When the payload was decoded.
    pub timestamp: DateTime<Utc>,
    /// PM10 concentration in µg/m³, one decimal place.
    pub pm10: f64,
    /// PM2.5 concentration in µg/m³, one decimal place.
    pub pm25: f64,
}

impl Reading {
    /// Decode an 8-byte streaming payload (the bytes after the `AA C0` marker).
    pub fn from_stream_payload(payload: &[u8; STREAM_PAYLOAD_SIZE]) -> Reading {
        Reading {
            timestamp: Utc::now(),
            pm10: pm_value(payload[0], payload[1]),
            pm25: pm_value(payload[2], payload[3]),
        }
    }

    /// Qualitative grade of the PM10 value.
    pub fn pm10_grade(&self) -> Grade {
        Grade::for_pm10(self.pm10)
    }

    /// Qualitative grade of the PM2.5 value.
    pub fn pm25_grade(&self) -> Grade {
        Grade::for_pm25(self.pm25)
    }
}

/// Responses received from the sensor over the command/response framing.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Measurement readout.
    Readout(Readout),

    /// Firmware version (dated year/month/day).
    Version {
        /// Firmware year (two digits).
        year: u8,
        /// Firmware month.
        month: u8,
        /// Firmware day.
        day: u8,
        /// Reporting sensor's id.
        device_id: DeviceId,
    },

    /// Reporting mode reply.
    ReportingMode {
        /// Actively reporting (true) or query-only (false).
        active: bool,
    },

    /// The device id was changed.
    DeviceIdChanged {
        /// The new id.
        device_id: DeviceId,
    },

    /// Power mode reply.
    PowerMode {
        /// Sleeping (true) or working (false).
        sleeping: bool,
    },

    /// Working cycle reply.
    Cycle {
        /// Minutes per cycle (0 = continuous).
        interval_minutes: u8,
    },

    /// Well-formed frame of a shape this crate does not recognize.
    ///
    /// This is a distinct observable outcome, not an error; callers typically
    /// log it for diagnostics.
    Unknown {
        /// The complete raw frame.
        raw: Vec<u8>,
    },
}

/// Low/high byte pair scaled to one decimal place.
fn pm_value(lo: u8, hi: u8) -> f64 {
    (((hi as u16) << 8) + lo as u16) as f64 / 10.0
}

impl Response {
    /// Decode a validated frame.
    ///
    /// The frame has already passed marker and checksum validation in the
    /// assembler; decoding never re-validates and never fails. Any frame
    /// that does not match a known shape (including one too short for its
    /// advertised type) decodes to [`Response::Unknown`].
    pub fn decode(frame: &[u8]) -> Response {
        if frame.len() >= RESPONSE_FRAME_SIZE {
            match (frame[1], frame[2]) {
                (RESP_READOUT, _) if frame.len() == RESPONSE_FRAME_SIZE => {
                    return Response::Readout(Readout {
                        timestamp: Utc::now(),
                        pm10: pm_value(frame[2], frame[3]),
                        pm25: pm_value(frame[4], frame[5]),
                        device_id: DeviceId::new([frame[6], frame[7]]),
                    });
                }

                (RESP_REPLY, CMD_QUERY_VERSION) => {
                    return Response::Version {
                        year: frame[3],
                        month: frame[4],
                        day: frame[5],
                        device_id: DeviceId::new([frame[6], frame[7]]),
                    };
                }

                (RESP_REPLY, CMD_SET_REPORTING_MODE) => {
                    return Response::ReportingMode {
                        active: frame[4] == 0,
                    };
                }

                (RESP_REPLY, CMD_SET_DEVICE_ID) => {
                    return Response::DeviceIdChanged {
                        device_id: DeviceId::new([frame[6], frame[7]]),
                    };
                }

                (RESP_REPLY, CMD_SET_POWER_MODE) => {
                    return Response::PowerMode {
                        sleeping: frame[4] == 0,
                    };
                }

                (RESP_REPLY, CMD_SET_CYCLE) => {
                    return Response::Cycle {
                        interval_minutes: frame[4],
                    };
                }

                _ => {}
            }
        }

        Response::Unknown {
            raw: frame.to_vec(),
        }
    }
}
