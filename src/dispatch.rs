//! Typed dispatch: decoding a tagged payload into the union of all record
//! variants.
//!
//! All tag-to-codec selection funnels through [`AnyRecord::decode`], so a
//! payload can never be decoded as the wrong variant and unknown tags fail
//! loudly instead of producing silently-wrong data.

use crate::error::DecodeError;
use crate::record::Record;
use crate::records::{
    ClientHello, ClientInput, ClientReady, Disconnect, Heartbeat, ProtocolError, RateLimit,
    ServerHello, WireRecord,
};
use crate::types::RecordType;

/// A decoded record: one variant per record type.
///
/// `Scene`, `Physics`, and `User` tags are reserved for systems layered
/// above this protocol; their payloads pass through opaque.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRecord {
    /// Protocol violation report.
    ProtocolError(ProtocolError),
    /// Client handshake opener.
    ClientHello(ClientHello),
    /// Server handshake reply.
    ServerHello(ServerHello),
    /// Client finished loading.
    ClientReady(ClientReady),
    /// End-of-session signal.
    Disconnect(Disconnect),
    /// Round-trip measurement phase.
    Heartbeat(Heartbeat),
    /// Rate-limit notice.
    RateLimit(RateLimit),
    /// Opaque scene-synchronization payload.
    Scene(Vec<u8>),
    /// Opaque physics-synchronization payload.
    Physics(Vec<u8>),
    /// Replicated input sample.
    ClientInput(ClientInput),
    /// Opaque application-defined payload.
    User(Vec<u8>),
}

impl AnyRecord {
    /// Decode `payload` according to `type_tag`.
    ///
    /// The single checked dispatch point: an out-of-range tag yields
    /// [`DecodeError::UnknownRecordType`], which the session layer reports
    /// to the peer as [`crate::types::ErrorCode::UnknownRecordType`].
    pub fn decode(type_tag: u32, payload: &[u8]) -> Result<AnyRecord, DecodeError> {
        let record_type = RecordType::try_from(type_tag)?;
        Ok(match record_type {
            RecordType::ProtocolError => AnyRecord::ProtocolError(ProtocolError::read(payload)?),
            RecordType::ClientHello => AnyRecord::ClientHello(ClientHello::read(payload)?),
            RecordType::ServerHello => AnyRecord::ServerHello(ServerHello::read(payload)?),
            RecordType::ClientReady => AnyRecord::ClientReady(ClientReady::read(payload)?),
            RecordType::Disconnect => AnyRecord::Disconnect(Disconnect::read(payload)?),
            RecordType::Heartbeat => AnyRecord::Heartbeat(Heartbeat::read(payload)?),
            RecordType::RateLimit => AnyRecord::RateLimit(RateLimit::read(payload)?),
            RecordType::Scene => AnyRecord::Scene(payload.to_vec()),
            RecordType::Physics => AnyRecord::Physics(payload.to_vec()),
            RecordType::ClientInput => AnyRecord::ClientInput(ClientInput::read(payload)?),
            RecordType::User => AnyRecord::User(payload.to_vec()),
        })
    }

    /// The record type this variant carries on the wire.
    pub fn record_type(&self) -> RecordType {
        match self {
            AnyRecord::ProtocolError(_) => RecordType::ProtocolError,
            AnyRecord::ClientHello(_) => RecordType::ClientHello,
            AnyRecord::ServerHello(_) => RecordType::ServerHello,
            AnyRecord::ClientReady(_) => RecordType::ClientReady,
            AnyRecord::Disconnect(_) => RecordType::Disconnect,
            AnyRecord::Heartbeat(_) => RecordType::Heartbeat,
            AnyRecord::RateLimit(_) => RecordType::RateLimit,
            AnyRecord::Scene(_) => RecordType::Scene,
            AnyRecord::Physics(_) => RecordType::Physics,
            AnyRecord::ClientInput(_) => RecordType::ClientInput,
            AnyRecord::User(_) => RecordType::User,
        }
    }

    /// Exact payload byte count this variant occupies on the wire.
    pub fn size_of(&self) -> usize {
        match self {
            AnyRecord::ProtocolError(r) => r.size_of(),
            AnyRecord::ClientHello(r) => r.size_of(),
            AnyRecord::ServerHello(r) => r.size_of(),
            AnyRecord::ClientReady(r) => r.size_of(),
            AnyRecord::Disconnect(r) => r.size_of(),
            AnyRecord::Heartbeat(r) => r.size_of(),
            AnyRecord::RateLimit(r) => r.size_of(),
            AnyRecord::Scene(bytes) => bytes.len(),
            AnyRecord::Physics(bytes) => bytes.len(),
            AnyRecord::ClientInput(r) => r.size_of(),
            AnyRecord::User(bytes) => bytes.len(),
        }
    }

    /// Encode this variant's payload into the front of `dest`, returning
    /// bytes written (always `self.size_of()`).
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than `self.size_of()`.
    pub fn write(&self, dest: &mut [u8]) -> usize {
        match self {
            AnyRecord::ProtocolError(r) => r.write(dest),
            AnyRecord::ClientHello(r) => r.write(dest),
            AnyRecord::ServerHello(r) => r.write(dest),
            AnyRecord::ClientReady(r) => r.write(dest),
            AnyRecord::Disconnect(r) => r.write(dest),
            AnyRecord::Heartbeat(r) => r.write(dest),
            AnyRecord::RateLimit(r) => r.write(dest),
            AnyRecord::ClientInput(r) => r.write(dest),
            AnyRecord::Scene(bytes) | AnyRecord::Physics(bytes) | AnyRecord::User(bytes) => {
                dest[..bytes.len()].copy_from_slice(bytes);
                bytes.len()
            }
        }
    }

    /// Frame this variant as a standalone [`Record`] with an owned payload.
    pub fn to_record(&self) -> Record {
        let mut payload = vec![0u8; self.size_of()];
        let written = self.write(&mut payload);
        debug_assert_eq!(written, payload.len());
        Record::new(self.record_type() as u32, payload)
    }
}
