//! SDS011 Serial Wire Protocol
//!
//! This crate provides types and utilities for communicating with the SDS011
//! laser particulate-matter sensor over its serial wire protocol. The sensor
//! speaks two framing disciplines, depending on firmware and configuration:
//!
//! - **Command/response mode**: checksummed frames delimited by `0xAA` …
//!   `0xAB`; the host sends configuration/query commands and the sensor
//!   replies with typed frames.
//! - **Continuous streaming mode**: a steady stream of fixed 10-byte readout
//!   frames opened by the `AA C0` marker.
//!
//! The crate is purely the protocol layer: it performs no I/O and holds no
//! timers. A transport collaborator (serial port, TCP bridge) pushes raw
//! byte chunks into a session and writes encoded command frames out.
//!
//! # Example
//!
//! ```rust,ignore
//! use sds011_protocol::{Command, CommandSession, Response};
//!
//! let mut session = CommandSession::new();
//!
//! // Build a command and hand the bytes to the transport.
//! let wire = session.encode_command(&Command::SetReportingMode { active: true });
//!
//! // Feed received chunks in, take typed responses out.
//! session.feed(&received_data);
//! while let Some(response) = session.try_decode() {
//!     println!("{:?}", response);
//! }
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod responses;
mod types;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use types::*;
