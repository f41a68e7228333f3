#![warn(missing_docs)]
//! Binary record protocol for real-time client/server game state
//! synchronization.
//!
//! Everything on the wire is little-endian and fixed-layout. One transport
//! write carries a 6-byte [`Container`] envelope followed by `num_records`
//! records, each framed as an 8-byte header (`type tag` + `payload length`)
//! and its payload. Decoding funnels through [`AnyRecord::decode`], so tags
//! always select the matching codec and unknown or malformed data fails
//! with a typed [`DecodeError`] instead of misreading bytes.
//!
//! The crate covers the message format and its encode/decode contracts:
//! handshake ([`ClientHello`]/[`ServerHello`]/[`ClientReady`]), heartbeat
//! round-trip and clock-offset measurement ([`Heartbeat`],
//! [`HeartbeatClock`]), rate limiting ([`RateLimit`], [`RateLimiter`]),
//! input replication ([`ClientInput`]), error signaling
//! ([`ProtocolError`]), and incremental stream reassembly
//! ([`StreamDecoder`]). Sockets, scene state, and physics state live in the
//! layers around it.

mod clock;
mod container;
mod dispatch;
mod error;
mod limits;
mod record;
mod records;
mod stream;
mod types;
mod wire;

pub use clock::{
    duration_to_ticks, ticks_to_duration, HeartbeatClock, PhaseError, TICKS_PER_MILLISECOND,
    TICKS_PER_SECOND,
};
pub use container::{Container, CONTAINER_SIZE};
pub use dispatch::AnyRecord;
pub use error::{DecodeError, StreamError};
pub use limits::{RateLimitStatus, RateLimiter, SessionLimits};
pub use record::{write_record, Record, RecordHeader, RECORD_HEADER_SIZE};
pub use records::{
    ClientHello, ClientInput, ClientReady, Disconnect, Heartbeat, ProtocolError, RateLimit,
    ServerHello, TestPayload, WireRecord, TEST_PAYLOAD_WORDS,
};
pub use stream::{encode_batch, StreamDecoder};
pub use types::{ErrorCode, ErrorSeverity, InputFlags, ProtocolVersion, RecordType};
