//! Per-record codecs: one fixed-layout struct (or enum) per protocol
//! message.
//!
//! Every type implements [`WireRecord`]: encode into a caller-sized buffer,
//! decode from a span of at least `size_of()` bytes, and report its exact
//! wire footprint. Field order on the wire is the declaration order below;
//! all primitives are little-endian.

use crate::error::DecodeError;
use crate::types::{ErrorCode, ErrorSeverity, InputFlags, RecordType};
use crate::wire::{WireReader, WireWriter};

/// Serialization contract shared by every record variant.
pub trait WireRecord: Sized {
    /// Tag written into the record header for this variant.
    const TYPE: RecordType;

    /// Human-readable variant name, used in error reporting.
    const NAME: &'static str;

    /// Exact byte count this record occupies on the wire. For
    /// variable-length records this depends on current field state.
    fn size_of(&self) -> usize;

    /// Encode into the front of `dest`, returning bytes written
    /// (always `self.size_of()`).
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than `self.size_of()`.
    fn write(&self, dest: &mut [u8]) -> usize;

    /// Decode from the front of `src`. Tolerates a span of exactly
    /// `size_of()` bytes; shorter spans fail with
    /// [`DecodeError::UnexpectedEof`].
    fn read(src: &[u8]) -> Result<Self, DecodeError>;
}

/// Handshake opener sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientHello {
    /// Build version of the connecting game client.
    pub game_version: u64,
    /// Client's local UTC offset, in 100 ns ticks.
    pub local_time_offset: i64,
}

impl WireRecord for ClientHello {
    const TYPE: RecordType = RecordType::ClientHello;
    const NAME: &'static str = "ClientHello";

    fn size_of(&self) -> usize {
        16
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        w.put_u64(self.game_version);
        w.put_i64(self.local_time_offset);
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        Ok(Self {
            game_version: r.get_u64()?,
            local_time_offset: r.get_i64()?,
        })
    }
}

/// Handshake reply from the server, carrying the session limits the client
/// must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHello {
    /// Build version of the server.
    pub game_version: u64,
    /// Server's local UTC offset, in 100 ns ticks.
    pub local_time_offset: i64,
    /// Heartbeat interval the client should use, in milliseconds.
    pub heartbeat_rate: u32,
    /// Maximum records per rate window.
    pub rate_limit: u32,
    /// Maximum accepted payload length in bytes.
    pub payload_limit: u32,
}

impl WireRecord for ServerHello {
    const TYPE: RecordType = RecordType::ServerHello;
    const NAME: &'static str = "ServerHello";

    fn size_of(&self) -> usize {
        28
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        w.put_u64(self.game_version);
        w.put_i64(self.local_time_offset);
        w.put_u32(self.heartbeat_rate);
        w.put_u32(self.rate_limit);
        w.put_u32(self.payload_limit);
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        Ok(Self {
            game_version: r.get_u64()?,
            local_time_offset: r.get_i64()?,
            heartbeat_rate: r.get_u32()?,
            rate_limit: r.get_u32()?,
            payload_limit: r.get_u32()?,
        })
    }
}

/// Client signals it finished loading and accepts game traffic. No payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientReady;

impl WireRecord for ClientReady {
    const TYPE: RecordType = RecordType::ClientReady;
    const NAME: &'static str = "ClientReady";

    fn size_of(&self) -> usize {
        0
    }

    fn write(&self, _dest: &mut [u8]) -> usize {
        0
    }

    fn read(_src: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self)
    }
}

/// Typed end-of-session signal. Carries no payload; the record header's tag
/// is the entire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disconnect;

impl WireRecord for Disconnect {
    const TYPE: RecordType = RecordType::Disconnect;
    const NAME: &'static str = "Disconnect";

    fn size_of(&self) -> usize {
        0
    }

    fn write(&self, _dest: &mut [u8]) -> usize {
        0
    }

    fn read(_src: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self)
    }
}

/// One replicated virtual-axis input sample.
///
/// The axis name travels as a u32 byte-length prefix followed by UTF-8
/// bytes. The `String` owns its storage, so release happens on drop and
/// re-decoding into a fresh value cannot leak a prior buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInput {
    /// Virtual axis name, e.g. "MoveForward".
    pub axis: String,
    /// Analog axis value.
    pub value: f32,
    /// Axis state bits.
    pub flags: InputFlags,
}

impl WireRecord for ClientInput {
    const TYPE: RecordType = RecordType::ClientInput;
    const NAME: &'static str = "ClientInput";

    fn size_of(&self) -> usize {
        4 + self.axis.len() + 4 + 1
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        w.put_u32(self.axis.len() as u32);
        w.put_bytes(self.axis.as_bytes());
        w.put_f32(self.value);
        w.put_u8(self.flags.bits());
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        let len = r.get_u32()? as usize;
        if len > r.remaining() {
            return Err(DecodeError::LengthMismatch {
                declared: len,
                actual: r.remaining(),
            });
        }
        let axis = std::str::from_utf8(r.get_bytes(len)?)
            .map_err(|_| DecodeError::InvalidUtf8)?
            .to_owned();
        Ok(Self {
            axis,
            value: r.get_f32()?,
            flags: InputFlags::from_bits_retain(r.get_u8()?),
        })
    }
}

/// Heartbeat phase discriminant values on the wire.
const HEARTBEAT_INITIAL: u8 = 0;
const HEARTBEAT_FIRST_TRIP: u8 = 1;
const HEARTBEAT_LAST_TRIP: u8 = 2;

/// One phase of the three-phase round-trip measurement.
///
/// The phases form a linear exchange: the originator sends `Initial`, the
/// responder echoes `FirstTrip` with its measured propagation delay, and the
/// originator closes with `LastTrip` carrying the computed round-trip time.
/// Each phase carries only the fields it needs, so the wire size varies:
/// 9, 17, and 9 bytes respectively. The kind byte at offset 0 is always
/// decoded first; the remainder of the span is interpreted per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heartbeat {
    /// Originator's opening probe.
    Initial {
        /// Originator's send time, in 100 ns ticks.
        timestamp: i64,
    },
    /// Responder's echo.
    FirstTrip {
        /// The originator's timestamp, echoed unchanged.
        timestamp: i64,
        /// Responder-measured one-way delay, in ticks.
        propagation_delay: i64,
    },
    /// Originator's closing measurement.
    LastTrip {
        /// Full round-trip time, in ticks.
        round_trip_time: i64,
    },
}

impl WireRecord for Heartbeat {
    const TYPE: RecordType = RecordType::Heartbeat;
    const NAME: &'static str = "Heartbeat";

    fn size_of(&self) -> usize {
        match self {
            Heartbeat::Initial { .. } => 9,
            Heartbeat::FirstTrip { .. } => 17,
            Heartbeat::LastTrip { .. } => 9,
        }
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        match *self {
            Heartbeat::Initial { timestamp } => {
                w.put_u8(HEARTBEAT_INITIAL);
                w.put_i64(timestamp);
            }
            Heartbeat::FirstTrip {
                timestamp,
                propagation_delay,
            } => {
                w.put_u8(HEARTBEAT_FIRST_TRIP);
                w.put_i64(timestamp);
                w.put_i64(propagation_delay);
            }
            Heartbeat::LastTrip { round_trip_time } => {
                w.put_u8(HEARTBEAT_LAST_TRIP);
                w.put_i64(round_trip_time);
            }
        }
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        // Kind decides how many of the following bytes are valid.
        match r.get_u8()? {
            HEARTBEAT_INITIAL => Ok(Heartbeat::Initial {
                timestamp: r.get_i64()?,
            }),
            HEARTBEAT_FIRST_TRIP => Ok(Heartbeat::FirstTrip {
                timestamp: r.get_i64()?,
                propagation_delay: r.get_i64()?,
            }),
            HEARTBEAT_LAST_TRIP => Ok(Heartbeat::LastTrip {
                round_trip_time: r.get_i64()?,
            }),
            kind => Err(DecodeError::InvalidDiscriminant {
                what: "heartbeat kind",
                value: kind as u64,
            }),
        }
    }
}

/// Rate-limit notice from the enforcing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Sender's time when the notice was produced, in ticks.
    pub timestamp: i64,
    /// Sender's time at which the current window resets, in ticks.
    pub rate_limit_reset: i64,
    /// True when this is an advance warning rather than enforcement.
    pub warning: bool,
}

impl WireRecord for RateLimit {
    const TYPE: RecordType = RecordType::RateLimit;
    const NAME: &'static str = "RateLimit";

    fn size_of(&self) -> usize {
        17
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        w.put_i64(self.timestamp);
        w.put_i64(self.rate_limit_reset);
        w.put_u8(self.warning as u8);
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        Ok(Self {
            timestamp: r.get_i64()?,
            rate_limit_reset: r.get_i64()?,
            warning: r.get_u8()? != 0,
        })
    }
}

/// Protocol violation report carried as data across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolError {
    /// What went wrong.
    pub code: ErrorCode,
    /// How seriously the receiver should treat it.
    pub severity: ErrorSeverity,
}

impl ProtocolError {
    /// Shorthand constructor.
    pub fn new(code: ErrorCode, severity: ErrorSeverity) -> Self {
        Self { code, severity }
    }
}

impl WireRecord for ProtocolError {
    const TYPE: RecordType = RecordType::ProtocolError;
    const NAME: &'static str = "ProtocolError";

    fn size_of(&self) -> usize {
        6
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        w.put_u32(self.code as u32);
        w.put_u16(self.severity as u16);
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        Ok(Self {
            code: ErrorCode::try_from(r.get_u32()?)?,
            severity: ErrorSeverity::try_from(r.get_u16()?)?,
        })
    }
}

/// Word count of the stress-test record.
pub const TEST_PAYLOAD_WORDS: usize = 8192;

/// Fixed 64 KiB record used to stress the framing layer; carries no game
/// meaning. Boxed so moving the record stays cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPayload {
    /// The raw word buffer.
    pub words: Box<[u64; TEST_PAYLOAD_WORDS]>,
}

impl TestPayload {
    /// All words set to the same value.
    pub fn filled(value: u64) -> Self {
        Self {
            words: Box::new([value; TEST_PAYLOAD_WORDS]),
        }
    }
}

impl Default for TestPayload {
    fn default() -> Self {
        Self::filled(0)
    }
}

impl WireRecord for TestPayload {
    // Stress traffic rides on the application-defined tag.
    const TYPE: RecordType = RecordType::User;
    const NAME: &'static str = "TestPayload";

    fn size_of(&self) -> usize {
        TEST_PAYLOAD_WORDS * 8
    }

    fn write(&self, dest: &mut [u8]) -> usize {
        let mut w = WireWriter::new(dest);
        for word in self.words.iter() {
            w.put_u64(*word);
        }
        w.position()
    }

    fn read(src: &[u8]) -> Result<Self, DecodeError> {
        let mut r = WireReader::new(src);
        let mut words = Box::new([0u64; TEST_PAYLOAD_WORDS]);
        for word in words.iter_mut() {
            *word = r.get_u64()?;
        }
        Ok(Self { words })
    }
}
