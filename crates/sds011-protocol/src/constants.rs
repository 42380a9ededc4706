//! Protocol constants
//!
//! These constants define the frame markers, type bytes, and fixed sizes
//! used by the SDS011 serial wire protocol.

// ============================================================================
// Frame markers
// ============================================================================

/// First byte of every frame in either direction.
pub const FRAME_START: u8 = 0xAA;
/// Last byte of every frame in either direction.
pub const FRAME_END: u8 = 0xAB;

/// Two-byte marker opening a readout frame in continuous streaming mode.
pub const STREAM_MARKER: [u8; 2] = [0xAA, 0xC0];

// ============================================================================
// Type bytes (sensor → host, frame byte 1)
// ============================================================================

/// Measurement readout frame.
pub const RESP_READOUT: u8 = 0xC0;
/// Reply to a configuration command; byte 2 carries the command subtype.
pub const RESP_REPLY: u8 = 0xC5;

// ============================================================================
// Command bytes (host → sensor)
// ============================================================================

/// Command group byte; first byte of every command body.
pub const CMD_GROUP: u8 = 0xB4;

/// Set the data reporting mode (active or query).
pub const CMD_SET_REPORTING_MODE: u8 = 0x02;
/// Request a single measurement readout.
pub const CMD_QUERY_DATA: u8 = 0x04;
/// Assign a new 2-byte device id.
pub const CMD_SET_DEVICE_ID: u8 = 0x05;
/// Put the sensor to sleep or wake it up.
pub const CMD_SET_POWER_MODE: u8 = 0x06;
/// Query the firmware version.
pub const CMD_QUERY_VERSION: u8 = 0x07;
/// Set the working cycle period in minutes (0 = continuous).
pub const CMD_SET_CYCLE: u8 = 0x08;

/// Device id selector addressing every sensor on the bus.
pub const BROADCAST_DEVICE_ID: [u8; 2] = [0xFF, 0xFF];

// ============================================================================
// Sizes
// ============================================================================

/// Smallest byte count that can hold a frame (markers, one data byte, checksum).
pub const MIN_FRAME_SIZE: usize = 5;
/// Every sensor → host frame is exactly 10 bytes.
pub const RESPONSE_FRAME_SIZE: usize = 10;
/// Command body: group byte, subtype, 12 data bytes, 2 device-id bytes.
pub const COMMAND_BODY_SIZE: usize = 16;
/// Full command frame: start marker, body, checksum, end marker.
pub const COMMAND_FRAME_SIZE: usize = COMMAND_BODY_SIZE + 3;
/// Streaming-mode frame: 2-byte marker plus payload.
pub const STREAM_FRAME_SIZE: usize = 10;
/// Payload bytes following the streaming marker.
pub const STREAM_PAYLOAD_SIZE: usize = STREAM_FRAME_SIZE - STREAM_MARKER.len();
