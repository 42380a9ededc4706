//! Transport and event plumbing for the SDS011 monitor.
//!
//! The protocol core in `sds011-protocol` is push-driven and I/O-free; this
//! crate supplies the collaborator side: pumping bytes between a serial
//! device and a protocol session, and surfacing decoded values as events.

pub mod driver;
