//! Stream reassembly and batch encoding.
//!
//! The transport delivers bytes in arbitrary chunks; [`StreamDecoder`]
//! accumulates them and walks the container → record-header → payload state
//! machine, yielding one owned [`Record`] at a time. [`encode_batch`] is the
//! outbound mirror: one container header followed by every record's header
//! and payload, sized exactly, suitable for a single transport write.

use crate::container::{Container, CONTAINER_SIZE};
use crate::dispatch::AnyRecord;
use crate::error::StreamError;
use crate::record::{Record, RecordHeader, RECORD_HEADER_SIZE};
use crate::types::ProtocolVersion;
use tracing::{trace, warn};

/// Incremental decoder turning an arbitrary-chunked byte stream into
/// complete records.
///
/// Feed bytes with [`feed`](StreamDecoder::feed), then drain with
/// [`next_record`](StreamDecoder::next_record) until it returns `Ok(None)`
/// ("need more data"). A [`StreamError`] means the peer violated the
/// protocol; [`StreamError::error_code`] gives the code to report back.
#[derive(Debug)]
pub struct StreamDecoder {
    buf: Vec<u8>,
    pos: usize,
    container: Option<Container>,
    records_seen: u16,
    pending: Option<RecordHeader>,
    payload_limit: u32,
}

impl StreamDecoder {
    /// Create a decoder enforcing `payload_limit` bytes per record payload.
    pub fn new(payload_limit: u32) -> Self {
        Self {
            buf: Vec::new(),
            pos: 0,
            container: None,
            records_seen: 0,
            pending: None,
            payload_limit,
        }
    }

    /// Version announced by the container currently being decoded, if any.
    pub fn current_version(&self) -> Option<ProtocolVersion> {
        self.container.map(|c| c.version)
    }

    /// Append freshly received bytes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.compact();
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes buffered but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len() - self.pos
    }

    // Drop consumed bytes so the buffer does not grow without bound.
    fn compact(&mut self) {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
    }

    fn unread(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    /// Try to produce the next complete record.
    ///
    /// `Ok(None)` means more bytes are needed; call [`feed`](Self::feed) and
    /// retry. An oversized payload fails with
    /// [`StreamError::PayloadTooLarge`] before any payload bytes are
    /// consumed, matching the fatal-error behavior of the session layer.
    pub fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        loop {
            if self.container.is_none() {
                let Some((container, read)) = Container::try_read(self.unread()) else {
                    return Ok(None);
                };
                self.pos += read;
                self.records_seen = 0;
                trace!(
                    version = container.version.0,
                    num_records = container.num_records,
                    "container header parsed"
                );
                // An empty batch carries nothing; look for the next one.
                if container.num_records == 0 {
                    continue;
                }
                self.container = Some(container);
            }

            let header = match self.pending {
                Some(header) => header,
                None => {
                    let Some((header, read)) = RecordHeader::try_read(self.unread()) else {
                        return Ok(None);
                    };
                    if header.length > self.payload_limit {
                        warn!(
                            type_tag = header.type_tag,
                            length = header.length,
                            limit = self.payload_limit,
                            "record payload exceeds negotiated limit"
                        );
                        return Err(StreamError::PayloadTooLarge {
                            length: header.length,
                            limit: self.payload_limit,
                        });
                    }
                    self.pos += read;
                    self.pending = Some(header);
                    header
                }
            };

            if self.buffered() < header.length as usize {
                return Ok(None);
            }

            let payload = self.unread()[..header.length as usize].to_vec();
            self.pos += header.length as usize;
            self.pending = None;
            self.records_seen += 1;

            if self
                .container
                .is_some_and(|c| c.num_records == self.records_seen)
            {
                self.container = None;
            }

            return Ok(Some(Record::new(header.type_tag, payload)));
        }
    }
}

/// Encode a batch of records behind container headers, sized exactly.
///
/// Mirrors the receive side: `[container][header][payload]...`, everything
/// little-endian, one allocation. A container counts records in a u16, so
/// batches beyond 65535 records are split across consecutive containers;
/// every container's count matches the records that follow it.
pub fn encode_batch(version: ProtocolVersion, records: &[AnyRecord]) -> Vec<u8> {
    let max_per_container = u16::MAX as usize;
    let num_containers = records.chunks(max_per_container).count().max(1);
    let total = num_containers * CONTAINER_SIZE
        + records
            .iter()
            .map(|r| RECORD_HEADER_SIZE + r.size_of())
            .sum::<usize>();
    let mut buf = vec![0u8; total];
    let mut idx = 0;

    if records.is_empty() {
        idx += Container {
            version,
            num_records: 0,
        }
        .write(&mut buf);
    }

    for chunk in records.chunks(max_per_container) {
        let container = Container {
            version,
            num_records: chunk.len() as u16,
        };
        idx += container.write(&mut buf[idx..]);

        for record in chunk {
            let header = RecordHeader {
                type_tag: record.record_type() as u32,
                length: record.size_of() as u32,
            };
            idx += header.write(&mut buf[idx..]);
            idx += record.write(&mut buf[idx..]);
        }
    }

    debug_assert_eq!(idx, total);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ClientHello, ClientInput, Heartbeat};
    use crate::types::{InputFlags, RecordType};

    fn sample_batch() -> Vec<AnyRecord> {
        vec![
            AnyRecord::ClientHello(ClientHello {
                game_version: 42,
                local_time_offset: 0,
            }),
            AnyRecord::Heartbeat(Heartbeat::Initial { timestamp: 99 }),
            AnyRecord::ClientInput(ClientInput {
                axis: "MoveForward".to_string(),
                value: 1.0,
                flags: InputFlags::PRESSED,
            }),
        ]
    }

    #[test]
    fn batch_roundtrips_through_decoder() {
        let records = sample_batch();
        let bytes = encode_batch(ProtocolVersion::V1, &records);

        let mut decoder = StreamDecoder::new(1024);
        decoder.feed(&bytes);

        for expected in &records {
            let record = decoder.next_record().unwrap().expect("complete record");
            assert_eq!(&record.decode().unwrap(), expected);
        }
        assert!(decoder.next_record().unwrap().is_none());
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn decoder_survives_byte_at_a_time_delivery() {
        let records = sample_batch();
        let bytes = encode_batch(ProtocolVersion::V1, &records);

        let mut decoder = StreamDecoder::new(1024);
        let mut decoded = Vec::new();
        for byte in bytes {
            decoder.feed(&[byte]);
            while let Some(record) = decoder.next_record().unwrap() {
                decoded.push(record.decode().unwrap());
            }
        }
        assert_eq!(decoded, records);
    }

    #[test]
    fn decoder_handles_back_to_back_containers() {
        let first = encode_batch(
            ProtocolVersion::V1,
            &[AnyRecord::Heartbeat(Heartbeat::Initial { timestamp: 1 })],
        );
        let second = encode_batch(
            ProtocolVersion::V1,
            &[AnyRecord::Heartbeat(Heartbeat::LastTrip {
                round_trip_time: 2,
            })],
        );

        let mut decoder = StreamDecoder::new(1024);
        decoder.feed(&first);
        decoder.feed(&second);

        let a = decoder.next_record().unwrap().unwrap();
        let b = decoder.next_record().unwrap().unwrap();
        assert_eq!(
            a.decode().unwrap(),
            AnyRecord::Heartbeat(Heartbeat::Initial { timestamp: 1 })
        );
        assert_eq!(
            b.decode().unwrap(),
            AnyRecord::Heartbeat(Heartbeat::LastTrip { round_trip_time: 2 })
        );
        assert!(decoder.next_record().unwrap().is_none());
    }

    #[test]
    fn empty_batch_is_skipped() {
        let empty = encode_batch(ProtocolVersion::V1, &[]);
        assert_eq!(empty.len(), CONTAINER_SIZE);

        let follow_up = encode_batch(
            ProtocolVersion::V1,
            &[AnyRecord::Heartbeat(Heartbeat::Initial { timestamp: 5 })],
        );

        let mut decoder = StreamDecoder::new(1024);
        decoder.feed(&empty);
        assert!(decoder.next_record().unwrap().is_none());

        decoder.feed(&follow_up);
        assert!(decoder.next_record().unwrap().is_some());
    }

    #[test]
    fn oversized_payload_is_rejected_before_buffering() {
        let mut bytes = Vec::new();
        let mut container_buf = [0u8; CONTAINER_SIZE];
        Container::new(1).write(&mut container_buf);
        bytes.extend_from_slice(&container_buf);

        let mut header_buf = [0u8; RECORD_HEADER_SIZE];
        RecordHeader {
            type_tag: RecordType::User as u32,
            length: 4096,
        }
        .write(&mut header_buf);
        bytes.extend_from_slice(&header_buf);

        let mut decoder = StreamDecoder::new(1024);
        decoder.feed(&bytes);
        let err = decoder.next_record().unwrap_err();
        assert_eq!(
            err,
            StreamError::PayloadTooLarge {
                length: 4096,
                limit: 1024
            }
        );
    }

    #[test]
    fn partial_header_waits_for_more_data() {
        let bytes = encode_batch(
            ProtocolVersion::V1,
            &[AnyRecord::ClientHello(ClientHello {
                game_version: 1,
                local_time_offset: 2,
            })],
        );

        let mut decoder = StreamDecoder::new(1024);
        // Container plus half a record header.
        decoder.feed(&bytes[..CONTAINER_SIZE + 4]);
        assert!(decoder.next_record().unwrap().is_none());

        decoder.feed(&bytes[CONTAINER_SIZE + 4..]);
        assert!(decoder.next_record().unwrap().is_some());
    }

    #[test]
    fn batch_beyond_u16_count_splits_containers() {
        use crate::records::Disconnect;

        let count = u16::MAX as usize + 2;
        let records = vec![AnyRecord::Disconnect(Disconnect); count];
        let bytes = encode_batch(ProtocolVersion::V1, &records);

        // Two containers, each counting exactly the records behind it.
        assert_eq!(
            bytes.len(),
            2 * CONTAINER_SIZE + count * RECORD_HEADER_SIZE
        );
        let (first, _) = Container::try_read(&bytes).unwrap();
        assert_eq!(first.num_records, u16::MAX);

        let mut decoder = StreamDecoder::new(1024);
        decoder.feed(&bytes);
        let mut seen = 0usize;
        while let Some(record) = decoder.next_record().unwrap() {
            assert_eq!(record.record_type().unwrap(), RecordType::Disconnect);
            seen += 1;
        }
        assert_eq!(seen, count);
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn exact_size_encoding() {
        let records = sample_batch();
        let bytes = encode_batch(ProtocolVersion::V1, &records);
        let expected = CONTAINER_SIZE
            + records
                .iter()
                .map(|r| RECORD_HEADER_SIZE + r.size_of())
                .sum::<usize>();
        assert_eq!(bytes.len(), expected);
    }

    #[test]
    fn version_surfaces_mid_batch() {
        let bytes = encode_batch(ProtocolVersion(3), &sample_batch());

        let mut decoder = StreamDecoder::new(1024);
        decoder.feed(&bytes);
        assert!(decoder.current_version().is_none());
        let _ = decoder.next_record().unwrap().unwrap();
        // Two records remain in this container.
        assert_eq!(decoder.current_version(), Some(ProtocolVersion(3)));
    }
}
