//! Commands that can be sent to the sensor.

use crate::constants::*;
use crate::frame::checksum;
use crate::types::DeviceId;

/// Commands that can be sent to the sensor.
///
/// Commands are fire-and-forget: the protocol defines no acknowledgment or
/// retry semantics, and any reply arrives asynchronously as a
/// [`Response`](crate::Response) matched by tag, not by request identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query the firmware version.
    QueryVersion,

    /// Set the data reporting mode.
    SetReportingMode {
        /// Report measurements actively (true) or only on query (false).
        active: bool,
    },

    /// Request a single measurement readout.
    QueryData,

    /// Assign a new device id.
    SetDeviceId {
        /// The id to assign.
        id: DeviceId,
    },

    /// Put the sensor to sleep or wake it up.
    SetPowerMode {
        /// Sleep (true) or work (false).
        sleep: bool,
    },

    /// Set the working cycle period.
    SetCycle {
        /// Minutes per cycle, 0–30 (0 = continuous). Out-of-range values are
        /// sent through unmodified; the sensor defines the behavior.
        interval_minutes: u8,
    },
}

impl Command {
    /// Get the command subtype byte.
    pub fn code(&self) -> u8 {
        match self {
            Command::QueryVersion => CMD_QUERY_VERSION,
            Command::SetReportingMode { .. } => CMD_SET_REPORTING_MODE,
            Command::QueryData => CMD_QUERY_DATA,
            Command::SetDeviceId { .. } => CMD_SET_DEVICE_ID,
            Command::SetPowerMode { .. } => CMD_SET_POWER_MODE,
            Command::SetCycle { .. } => CMD_SET_CYCLE,
        }
    }

    /// Build the fixed 16-byte command body.
    ///
    /// Layout: group byte, subtype, command-specific fields at fixed offsets,
    /// zero padding, broadcast device-id selector in the last two bytes.
    pub fn body(&self) -> [u8; COMMAND_BODY_SIZE] {
        let mut body = [0u8; COMMAND_BODY_SIZE];
        body[0] = CMD_GROUP;
        body[1] = self.code();
        body[COMMAND_BODY_SIZE - 2] = BROADCAST_DEVICE_ID[0];
        body[COMMAND_BODY_SIZE - 1] = BROADCAST_DEVICE_ID[1];

        match self {
            Command::QueryVersion | Command::QueryData => {}

            Command::SetReportingMode { active } => {
                body[2] = 1; // set, not query
                body[3] = if *active { 0 } else { 1 };
            }

            Command::SetDeviceId { id } => {
                body[12] = id.0[0];
                body[13] = id.0[1];
            }

            Command::SetPowerMode { sleep } => {
                body[2] = 1;
                body[3] = if *sleep { 0 } else { 1 };
            }

            Command::SetCycle { interval_minutes } => {
                body[2] = 1;
                body[3] = *interval_minutes;
            }
        }

        body
    }

    /// Encode the command as a complete 19-byte wire frame.
    ///
    /// The checksum covers every body byte after the group byte.
    pub fn encode(&self) -> Vec<u8> {
        let body = self.body();
        let mut buf = Vec::with_capacity(COMMAND_FRAME_SIZE);
        buf.push(FRAME_START);
        buf.extend_from_slice(&body);
        buf.push(checksum(&body[1..]));
        buf.push(FRAME_END);
        buf
    }
}
