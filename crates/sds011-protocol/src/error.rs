//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with the sensor protocol.
///
/// Note that malformed frames on the wire are not errors: the assembler
/// drops them, and well-formed frames of unrecognized shape decode to
/// [`Response::Unknown`](crate::Response::Unknown).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Device id text did not parse as 4 hex characters.
    #[error("invalid device id {0:?}: expected 4 hex characters")]
    InvalidDeviceId(String),
}
