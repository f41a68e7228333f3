//! Container: the 6-byte batch envelope preceding records in one transport
//! write.
//!
//! Wire layout: `[u32 version][u16 num_records]` little-endian. A container
//! announces how many records follow; it does not own them.

use crate::types::ProtocolVersion;
use crate::wire::{WireReader, WireWriter};

/// Size of the container header on the wire.
pub const CONTAINER_SIZE: usize = 6;

/// Batch envelope: protocol version plus the count of records that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    /// Protocol version the sender speaks.
    pub version: ProtocolVersion,
    /// Number of record entries immediately following in the stream.
    pub num_records: u16,
}

impl Container {
    /// Build a V1 container for `num_records` records.
    pub fn new(num_records: u16) -> Self {
        Self {
            version: ProtocolVersion::V1,
            num_records,
        }
    }

    /// Write the 6 envelope bytes to the front of `buf`, returning bytes
    /// written.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`CONTAINER_SIZE`].
    pub fn write(&self, buf: &mut [u8]) -> usize {
        let mut w = WireWriter::new(buf);
        w.put_u32(self.version.0);
        w.put_u16(self.num_records);
        w.position()
    }

    /// Try to parse a container from the front of `buf`.
    ///
    /// Returns `None` when fewer than [`CONTAINER_SIZE`] bytes are
    /// available, which signals that more data is needed rather than an
    /// error. On success the second tuple element is the bytes consumed
    /// (always 6).
    pub fn try_read(buf: &[u8]) -> Option<(Container, usize)> {
        if buf.len() < CONTAINER_SIZE {
            return None;
        }
        let mut r = WireReader::new(buf);
        let version = ProtocolVersion(r.get_u32().ok()?);
        let num_records = r.get_u16().ok()?;
        Some((
            Container {
                version,
                num_records,
            },
            CONTAINER_SIZE,
        ))
    }
}
