use std::io::{ErrorKind, Read};

use tracing::trace;

use super::bytes::Bytes;
use super::MAGIC;
use crate::Result;

/// Synchronizer scans a byte stream for the start of a frame indicated by a
/// magic byte sequence.
///
/// Bytes that cannot be the start of the marker are discarded. When a partial
/// match fails every byte after the first is checked again as a possible
/// marker start, so a frame is never lost to a stray leading byte.
pub struct Synchronizer<R>
where
    R: Read,
{
    bytes: Bytes<R>,
    magic: Vec<u8>,
    /// Count of bytes discarded while searching for the marker.
    pub discarded: usize,
}

impl<R> Synchronizer<R>
where
    R: Read,
{
    /// Creates a new ``Synchronizer`` that scans for `magic`.
    ///
    /// # Panics
    /// If `magic` is empty.
    pub fn new(reader: R, magic: &[u8]) -> Self {
        assert!(!magic.is_empty(), "magic must not be empty");
        Synchronizer {
            bytes: Bytes::new(reader),
            magic: magic.to_vec(),
            discarded: 0,
        }
    }

    /// Creates a ``Synchronizer`` for the PMS5003 frame marker.
    pub fn pms5003(reader: R) -> Self {
        Self::new(reader, &MAGIC)
    }

    /// Scan the stream until the next marker is found and return the offset of the
    /// first byte after it.
    ///
    /// # Errors
    /// On [ErrorKind::UnexpectedEof] this will return [Ok(None)]. Any other error will result
    /// in [Err(err)].
    pub fn scan(&mut self) -> Result<Option<usize>> {
        let mut working: Vec<u8> = Vec::with_capacity(self.magic.len());

        'next_start: loop {
            for idx in 0..self.magic.len() {
                let b = match self.bytes.next() {
                    Ok(b) => b,
                    Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                    Err(err) => return Err(err.into()),
                };
                working.push(b);

                if b != self.magic[idx] {
                    // The first working byte cannot start a marker; everything after
                    // it still might.
                    self.bytes.push(&working[1..]);
                    trace!(byte = working[0], offset = self.bytes.offset(), "discarding");
                    self.discarded += 1;
                    working.clear();
                    continue 'next_start;
                }
            }
            return Ok(Some(self.bytes.offset()));
        }
    }

    /// Read a big-endian u16, or `None` on EOF.
    ///
    /// # Errors
    /// Any non-EOF read error.
    pub fn read_u16(&mut self) -> Result<Option<u16>> {
        Ok(self.bytes.read_u16()?)
    }

    /// Fill `buf` from the stream, returning `false` on EOF.
    ///
    /// # Errors
    /// Any non-EOF read error.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<bool> {
        Ok(self.bytes.fill(buf)?)
    }

    /// Number of bytes consumed from the stream.
    pub fn offset(&self) -> usize {
        self.bytes.offset()
    }
}
