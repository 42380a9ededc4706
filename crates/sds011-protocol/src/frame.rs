//! Frame assembly and session utilities.
//!
//! Two framing disciplines exist on the wire, depending on sensor firmware
//! and configuration:
//!
//! - **Command/response mode**: frames delimited by `0xAA` … `0xAB` with a
//!   checksum byte before the end marker.
//!
//! ```text
//! +------+------+-----------------+----------+------+
//! | 0xAA | type | data[0..6]      | checksum | 0xAB |
//! +------+------+-----------------+----------+------+
//! ```
//!
//! - **Continuous streaming mode**: fixed 10-byte frames opened by the
//!   2-byte readout marker `AA C0`, followed by 8 payload bytes.
//!
//! Both assemblers are push-driven and perform no I/O: the transport hands
//! them raw chunks, they hand back complete frames. Neither is safe for
//! concurrent mutation; serialize externally if threads are involved.

use bytes::{Buf, BytesMut};

use crate::commands::Command;
use crate::constants::*;
use crate::responses::{Reading, Response};

/// Sum of all bytes, modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Assembler for command/response framing.
///
/// Incoming chunks accumulate in an internal buffer; once at least a minimal
/// frame is buffered, the whole buffered candidate is judged as one frame.
/// A candidate with bad markers or a bad checksum is dropped wholesale —
/// this mode does not scan forward for the next start marker. Corruption on
/// a real line is bounded by link bandwidth, so a persistently non-matching
/// buffer is steady state, not a leak.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl FrameAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        FrameAssembler {
            buffer: BytesMut::with_capacity(RESPONSE_FRAME_SIZE * 2),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take a complete validated frame from the buffer.
    ///
    /// Returns `Some(frame)` if the buffered candidate is a valid frame, or
    /// `None` if more data is needed or the candidate was dropped as noise.
    /// At most one frame is emitted per satisfied buffer state.
    pub fn decode(&mut self) -> Option<Vec<u8>> {
        let len = self.buffer.len();
        if len < MIN_FRAME_SIZE {
            return None;
        }

        if self.buffer[0] != FRAME_START || self.buffer[len - 1] != FRAME_END {
            log::debug!(
                "dropping {} buffered bytes: bad frame markers {:02x} … {:02x}",
                len,
                self.buffer[0],
                self.buffer[len - 1]
            );
            self.buffer.clear();
            return None;
        }

        // Checksum covers the bytes between the type byte and the trailing
        // checksum + end-marker pair.
        let expected = checksum(&self.buffer[2..len - 2]);
        if expected != self.buffer[len - 2] {
            log::debug!(
                "dropping frame: checksum {:02x}, expected {:02x}",
                self.buffer[len - 2],
                expected
            );
            self.buffer.clear();
            return None;
        }

        Some(self.buffer.split_to(len).to_vec())
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Assembler for continuous streaming framing.
///
/// Unlike [`FrameAssembler`], this mode resynchronizes: it scans for the
/// `AA C0` marker anywhere in the buffer and discards preceding noise, so a
/// corrupted stretch costs at most the frames it overlaps.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl StreamAssembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        StreamAssembler {
            buffer: BytesMut::with_capacity(STREAM_FRAME_SIZE * 2),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take the payload of the next marked frame from the buffer.
    ///
    /// Returns the 8 payload bytes following the marker, or `None` if no
    /// complete frame is buffered yet. Call repeatedly to drain a chunk that
    /// carried several frames.
    pub fn decode(&mut self) -> Option<[u8; STREAM_PAYLOAD_SIZE]> {
        // Scan for the marker, discarding any preceding garbage.
        let start = self
            .buffer
            .windows(STREAM_MARKER.len())
            .position(|w| w == STREAM_MARKER)?;
        if start > 0 {
            log::debug!("resync: discarding {} bytes before stream marker", start);
            self.buffer.advance(start);
        }

        if self.buffer.len() < STREAM_FRAME_SIZE {
            return None;
        }

        let mut payload = [0u8; STREAM_PAYLOAD_SIZE];
        payload.copy_from_slice(&self.buffer[STREAM_MARKER.len()..STREAM_FRAME_SIZE]);
        self.buffer.advance(STREAM_FRAME_SIZE);

        Some(payload)
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// A simple push-driven interface over the command/response framing.
///
/// This can be used with any byte stream (serial port, TCP bridge, etc.):
/// feed received chunks in, take decoded responses out, and write encoded
/// commands to the transport yourself.
#[derive(Debug, Default)]
pub struct CommandSession {
    assembler: FrameAssembler,
}

impl CommandSession {
    /// Create a new session.
    pub fn new() -> Self {
        CommandSession {
            assembler: FrameAssembler::new(),
        }
    }

    /// Encode a command for transmission.
    pub fn encode_command(&self, command: &Command) -> Vec<u8> {
        command.encode()
    }

    /// Feed received data into the assembler.
    pub fn feed(&mut self, data: &[u8]) {
        self.assembler.push(data);
    }

    /// Try to decode the next response.
    ///
    /// Malformed frames were already dropped by the assembler; a decoded
    /// frame always yields a response, possibly [`Response::Unknown`].
    pub fn try_decode(&mut self) -> Option<Response> {
        self.assembler.decode().map(|frame| Response::decode(&frame))
    }

    /// Reset the session state.
    pub fn reset(&mut self) {
        self.assembler.clear();
    }
}

/// A push-driven interface over the continuous streaming framing.
#[derive(Debug, Default)]
pub struct StreamSession {
    assembler: StreamAssembler,
}

impl StreamSession {
    /// Create a new session.
    pub fn new() -> Self {
        StreamSession {
            assembler: StreamAssembler::new(),
        }
    }

    /// Feed received data into the assembler.
    pub fn feed(&mut self, data: &[u8]) {
        self.assembler.push(data);
    }

    /// Try to decode the next reading.
    pub fn try_decode(&mut self) -> Option<Reading> {
        self.assembler
            .decode()
            .map(|payload| Reading::from_stream_payload(&payload))
    }

    /// Reset the session state.
    pub fn reset(&mut self) {
        self.assembler.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 10-byte sensor frame with a valid checksum.
    fn response_frame(type_byte: u8, data: [u8; 6]) -> Vec<u8> {
        let mut f = vec![FRAME_START, type_byte];
        f.extend_from_slice(&data);
        f.push(checksum(&data));
        f.push(FRAME_END);
        f
    }

    #[test]
    fn test_assembler_valid_frame() {
        let mut assembler = FrameAssembler::new();
        let frame = response_frame(RESP_READOUT, [0xD4, 0x04, 0x3A, 0xA4, 0x68, 0x3C]);

        assembler.push(&frame);
        assert_eq!(assembler.decode(), Some(frame));
        assert_eq!(assembler.buffered_len(), 0);
    }

    #[test]
    fn test_assembler_waits_for_minimum() {
        let mut assembler = FrameAssembler::new();
        assembler.push(&[FRAME_START, RESP_READOUT, 0xD4]);
        assert!(assembler.decode().is_none());
        // Short arrivals stay buffered rather than being judged.
        assert_eq!(assembler.buffered_len(), 3);
    }

    #[test]
    fn test_assembler_drops_bad_end_marker() {
        let mut assembler = FrameAssembler::new();
        let mut frame = response_frame(RESP_READOUT, [0xD4, 0x04, 0x3A, 0xA4, 0x68, 0x3C]);
        *frame.last_mut().unwrap() = 0x00;

        assembler.push(&frame);
        assert!(assembler.decode().is_none());
        assert_eq!(assembler.buffered_len(), 0);

        // The next well-formed frame is unaffected by the dropped candidate.
        let good = response_frame(RESP_READOUT, [0xC7, 0x00, 0x77, 0x00, 0x68, 0x3C]);
        assembler.push(&good);
        assert_eq!(assembler.decode(), Some(good));
    }

    #[test]
    fn test_assembler_drops_bad_checksum() {
        let mut assembler = FrameAssembler::new();
        let mut frame = response_frame(RESP_READOUT, [0xD4, 0x04, 0x3A, 0xA4, 0x68, 0x3C]);
        let cs_index = frame.len() - 2;
        frame[cs_index] = frame[cs_index].wrapping_add(1);

        assembler.push(&frame);
        assert!(assembler.decode().is_none());
        assert_eq!(assembler.buffered_len(), 0);
    }

    #[test]
    fn test_assembler_emits_at_most_one_frame_per_push() {
        let mut assembler = FrameAssembler::new();
        let frame = response_frame(RESP_READOUT, [0xD4, 0x04, 0x3A, 0xA4, 0x68, 0x3C]);

        assembler.push(&frame);
        assert!(assembler.decode().is_some());
        assert!(assembler.decode().is_none());
    }

    #[test]
    fn test_stream_assembler_resync() {
        let mut assembler = StreamAssembler::new();

        // Garbage, one marked frame, more garbage.
        let mut data = vec![0x01, 0xFF, 0xAB, 0x77];
        data.extend_from_slice(&STREAM_MARKER);
        data.extend_from_slice(&[0xD4, 0x04, 0x3A, 0x0A, 0x68, 0x3C, 0x00, 0xAB]);
        data.extend_from_slice(&[0x13, 0x37]);

        assembler.push(&data);
        assert_eq!(
            assembler.decode(),
            Some([0xD4, 0x04, 0x3A, 0x0A, 0x68, 0x3C, 0x00, 0xAB])
        );
        // Trailing garbage has no marker, so nothing more comes out.
        assert!(assembler.decode().is_none());
    }

    #[test]
    fn test_stream_assembler_partial_frame() {
        let mut assembler = StreamAssembler::new();

        assembler.push(&STREAM_MARKER);
        assembler.push(&[0xD4, 0x04, 0x3A]);
        assert!(assembler.decode().is_none());

        assembler.push(&[0x0A, 0x68, 0x3C, 0x00, 0xAB]);
        assert_eq!(
            assembler.decode(),
            Some([0xD4, 0x04, 0x3A, 0x0A, 0x68, 0x3C, 0x00, 0xAB])
        );
    }

    #[test]
    fn test_stream_assembler_multiple_frames_per_chunk() {
        let mut assembler = StreamAssembler::new();

        let mut data = Vec::new();
        for i in 0..3u8 {
            data.extend_from_slice(&STREAM_MARKER);
            data.extend_from_slice(&[i, 0, i, 0, 0x68, 0x3C, 0x00, 0xAB]);
        }

        assembler.push(&data);
        for i in 0..3u8 {
            assert_eq!(assembler.decode(), Some([i, 0, i, 0, 0x68, 0x3C, 0x00, 0xAB]));
        }
        assert!(assembler.decode().is_none());
    }

    #[test]
    fn test_stream_assembler_chunk_invariance() {
        // The same byte stream split at every possible boundary yields the
        // same payload sequence.
        let mut stream = vec![0x55, 0x00]; // leading noise
        for i in 0..4u8 {
            stream.extend_from_slice(&STREAM_MARKER);
            stream.extend_from_slice(&[i, 1, i, 2, 0x68, 0x3C, 0x00, 0xAB]);
            stream.push(0xEE); // inter-frame noise
        }

        let mut whole = StreamAssembler::new();
        whole.push(&stream);
        let mut expected = Vec::new();
        while let Some(p) = whole.decode() {
            expected.push(p);
        }
        assert_eq!(expected.len(), 4);

        for split in 0..stream.len() {
            let mut assembler = StreamAssembler::new();
            let mut got = Vec::new();
            assembler.push(&stream[..split]);
            while let Some(p) = assembler.decode() {
                got.push(p);
            }
            assembler.push(&stream[split..]);
            while let Some(p) = assembler.decode() {
                got.push(p);
            }
            assert_eq!(got, expected, "split at {}", split);
        }

        // Byte-by-byte delivery as well.
        let mut assembler = StreamAssembler::new();
        let mut got = Vec::new();
        for b in &stream {
            assembler.push(&[*b]);
            while let Some(p) = assembler.decode() {
                got.push(p);
            }
        }
        assert_eq!(got, expected);
    }

    #[test]
    fn test_echoed_command_frame_passes_validation() {
        // The decode-side checksum span lines up with the encode-side span,
        // so a command frame echoed back unmodified validates cleanly (and
        // then decodes as Unknown, since 0xB4 is not a response type).
        let mut assembler = FrameAssembler::new();
        for cmd in [
            Command::QueryVersion,
            Command::SetCycle { interval_minutes: 7 },
        ] {
            let frame = cmd.encode();
            assembler.push(&frame);
            assert_eq!(assembler.decode(), Some(frame));
        }
    }

    #[test]
    fn test_command_session_round_trip_shape() {
        let mut session = CommandSession::new();
        let wire = session.encode_command(&Command::SetCycle { interval_minutes: 2 });
        assert_eq!(wire.len(), COMMAND_FRAME_SIZE);

        // A sensor reply echoing the subtype decodes to the matching tag.
        let reply = response_frame(RESP_REPLY, [CMD_SET_CYCLE, 1, 2, 0, 0x68, 0x3C]);
        session.feed(&reply);
        assert_eq!(
            session.try_decode(),
            Some(Response::Cycle { interval_minutes: 2 })
        );
    }

    #[test]
    fn test_command_session_malformed_then_valid() {
        let mut session = CommandSession::new();

        session.feed(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00]);
        assert!(session.try_decode().is_none());

        let reply = response_frame(RESP_REPLY, [CMD_SET_REPORTING_MODE, 1, 0, 0, 0x68, 0x3C]);
        session.feed(&reply);
        assert_eq!(
            session.try_decode(),
            Some(Response::ReportingMode { active: true })
        );
    }

    #[test]
    fn test_stream_session_yields_graded_readings() {
        let mut session = StreamSession::new();
        let mut data = Vec::from(STREAM_MARKER);
        data.extend_from_slice(&[0xC7, 0x00, 0x77, 0x00, 0x68, 0x3C, 0x00, 0xAB]);

        session.feed(&data);
        let reading = session.try_decode().expect("should decode reading");
        assert_eq!(reading.pm10, 19.9);
        assert_eq!(reading.pm25, 11.9);
        assert_eq!(reading.pm10_grade().to_string(), "very good");
        assert!(session.try_decode().is_none());
    }
}
