//! Record framing: the 8-byte header and the owned-payload record unit.
//!
//! Wire layout: `[u32 type_tag][u32 length]` little-endian, followed by
//! exactly `length` payload bytes. Header parsing deliberately does not
//! validate the type tag; tag validation happens at dispatch so an unknown
//! tag can be reported to the peer as [`crate::types::ErrorCode::UnknownRecordType`]
//! instead of being dropped on the floor mid-stream.

use crate::dispatch::AnyRecord;
use crate::error::DecodeError;
use crate::records::WireRecord;
use crate::types::RecordType;
use crate::wire::{WireReader, WireWriter};

/// Size of the record header on the wire.
pub const RECORD_HEADER_SIZE: usize = 8;

/// Parsed record header: raw type tag plus declared payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Raw record type tag, unvalidated at this layer.
    pub type_tag: u32,
    /// Payload byte count following the header.
    pub length: u32,
}

impl RecordHeader {
    /// Try to parse a header from the front of `buf`.
    ///
    /// Returns `None` when fewer than [`RECORD_HEADER_SIZE`] bytes are
    /// available, which signals that more data is needed rather than an
    /// error. On success the second tuple element is the bytes consumed
    /// (always 8).
    pub fn try_read(buf: &[u8]) -> Option<(RecordHeader, usize)> {
        if buf.len() < RECORD_HEADER_SIZE {
            return None;
        }
        let mut r = WireReader::new(buf);
        // Both reads are infallible after the length check.
        let type_tag = r.get_u32().ok()?;
        let length = r.get_u32().ok()?;
        Some((RecordHeader { type_tag, length }, RECORD_HEADER_SIZE))
    }

    /// Write the 8 header bytes to the front of `buf`, returning bytes
    /// written.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`RECORD_HEADER_SIZE`].
    pub fn write(&self, buf: &mut [u8]) -> usize {
        let mut w = WireWriter::new(buf);
        w.put_u32(self.type_tag);
        w.put_u32(self.length);
        w.position()
    }
}

/// One self-describing protocol message: a type tag and an owned payload.
///
/// The payload buffer's lifetime is exactly the record's lifetime: `Clone`
/// deep-copies it and `Drop` releases it, so each copy is released exactly
/// once and a double release is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    type_tag: u32,
    payload: Vec<u8>,
}

impl Record {
    /// Build a record from a raw tag and an owned payload buffer.
    pub fn new(type_tag: u32, payload: Vec<u8>) -> Self {
        Self { type_tag, payload }
    }

    /// Encode a typed record into a standalone `Record`.
    pub fn from_wire_record<T: WireRecord>(record: &T) -> Self {
        let mut payload = vec![0u8; record.size_of()];
        let written = record.write(&mut payload);
        debug_assert_eq!(written, payload.len());
        Self {
            type_tag: T::TYPE as u32,
            payload,
        }
    }

    /// Raw type tag from the header.
    pub fn type_tag(&self) -> u32 {
        self.type_tag
    }

    /// Validated record type, if the tag is in range.
    pub fn record_type(&self) -> Result<RecordType, DecodeError> {
        RecordType::try_from(self.type_tag)
    }

    /// Payload byte length.
    pub fn length(&self) -> u32 {
        self.payload.len() as u32
    }

    /// Borrow the payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Header describing this record.
    pub fn header(&self) -> RecordHeader {
        RecordHeader {
            type_tag: self.type_tag,
            length: self.length(),
        }
    }

    /// Decode the payload into the tagged union of all record variants.
    ///
    /// This is the single checked dispatch point: the tag selects the codec,
    /// and an unknown tag fails with [`DecodeError::UnknownRecordType`].
    pub fn decode(&self) -> Result<AnyRecord, DecodeError> {
        AnyRecord::decode(self.type_tag, &self.payload)
    }

    /// Decode the payload as a specific record type, verifying the tag first.
    ///
    /// Unlike the unchecked reinterpretation this replaces, asking for the
    /// wrong type yields [`DecodeError::TypeMismatch`] rather than silently
    /// misreading the payload.
    pub fn decode_as<T: WireRecord>(&self) -> Result<T, DecodeError> {
        if self.type_tag != T::TYPE as u32 {
            return Err(DecodeError::TypeMismatch {
                expected: T::NAME,
                actual: self.type_tag,
            });
        }
        T::read(&self.payload)
    }

    /// Consume the record, yielding its payload buffer.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Write header plus payload for a typed record into `dest`, returning total
/// bytes written (`RECORD_HEADER_SIZE + record.size_of()`).
///
/// # Panics
///
/// Panics if `dest` is too short for the header and payload.
pub fn write_record<T: WireRecord>(dest: &mut [u8], record: &T) -> usize {
    let size = record.size_of();
    let header = RecordHeader {
        type_tag: T::TYPE as u32,
        length: size as u32,
    };
    let mut written = header.write(dest);
    written += record.write(&mut dest[written..]);
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ClientHello, Disconnect, Heartbeat};

    #[test]
    fn header_roundtrip() {
        let header = RecordHeader {
            type_tag: RecordType::Heartbeat as u32,
            length: 17,
        };
        let mut buf = [0u8; RECORD_HEADER_SIZE];
        assert_eq!(header.write(&mut buf), RECORD_HEADER_SIZE);

        let (parsed, read) = RecordHeader::try_read(&buf).unwrap();
        assert_eq!(read, RECORD_HEADER_SIZE);
        assert_eq!(parsed, header);
    }

    #[test]
    fn header_needs_eight_bytes() {
        let buf = [0u8; RECORD_HEADER_SIZE - 1];
        assert!(RecordHeader::try_read(&buf).is_none());
        assert!(RecordHeader::try_read(&[]).is_none());
    }

    #[test]
    fn header_bytes_are_little_endian() {
        let header = RecordHeader {
            type_tag: 0x04030201,
            length: 0x08070605,
        };
        let mut buf = [0u8; RECORD_HEADER_SIZE];
        header.write(&mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn header_does_not_validate_type_tag() {
        // Unknown tags parse fine here; dispatch rejects them later.
        let mut buf = [0u8; RECORD_HEADER_SIZE];
        RecordHeader {
            type_tag: 9999,
            length: 0,
        }
        .write(&mut buf);
        let (parsed, _) = RecordHeader::try_read(&buf).unwrap();
        assert_eq!(parsed.type_tag, 9999);
    }

    #[test]
    fn write_record_prefixes_header() {
        let hello = ClientHello {
            game_version: 42,
            local_time_offset: 0,
        };
        let mut buf = [0u8; 64];
        let written = write_record(&mut buf, &hello);
        assert_eq!(written, RECORD_HEADER_SIZE + 16);

        let (header, _) = RecordHeader::try_read(&buf).unwrap();
        assert_eq!(header.type_tag, RecordType::ClientHello as u32);
        assert_eq!(header.length, 16);
    }

    #[test]
    fn record_clone_is_deep() {
        let original = Record::new(RecordType::User as u32, vec![1, 2, 3]);
        let clone = original.clone();
        drop(original);
        // Clone keeps its own buffer alive after the original is released.
        assert_eq!(clone.payload(), &[1, 2, 3]);
    }

    #[test]
    fn decode_as_checks_the_tag() {
        let record = Record::from_wire_record(&Disconnect);
        let err = record.decode_as::<Heartbeat>().unwrap_err();
        assert_eq!(
            err,
            DecodeError::TypeMismatch {
                expected: Heartbeat::NAME,
                actual: RecordType::Disconnect as u32,
            }
        );
        assert!(record.decode_as::<Disconnect>().is_ok());
    }

    #[test]
    fn length_tracks_payload() {
        let record = Record::from_wire_record(&ClientHello {
            game_version: 1,
            local_time_offset: -1,
        });
        assert_eq!(record.length(), 16);
        assert_eq!(record.payload().len(), 16);
    }
}
