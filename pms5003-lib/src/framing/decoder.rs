use std::io::Read;

use serde::Serialize;
use tracing::{debug, trace};

use super::{checksum, Frame, Synchronizer};
use crate::sample::Sample;
use crate::Result;

/// Counters describing the data seen by a [FrameDecoder].
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames successfully decoded.
    pub frames: u64,
    /// Bytes discarded while searching for the start of a frame.
    pub discarded_bytes: u64,
    /// Frames dropped because the length field was not [Frame::PAYLOAD_LEN].
    pub bad_length: u64,
    /// Frames dropped because checksum validation was enabled and failed.
    pub bad_checksum: u64,
}

/// Decodes PMS5003 frames from a byte stream.
///
/// Malformed data is never reported as an error. Noise is skipped while
/// searching for the frame marker and frames with an unexpected length are
/// dropped. Only errors from the underlying reader are returned.
///
/// When the length field is not [Frame::PAYLOAD_LEN] only the marker and the
/// length field are consumed; searching resumes with the byte after the length
/// field.
///
/// # Examples
/// ```
/// use pms5003::framing::FrameDecoder;
///
/// let mut dat = vec![0x42, 0x4d, 0x00, 0x1c];
/// for word in [0u16, 0, 0, 0, 0, 0, 10, 8, 5, 2, 1, 0, 0, 0] {
///     dat.extend_from_slice(&word.to_be_bytes());
/// }
/// let samples: Vec<_> = FrameDecoder::new(&dat[..])
///     .filter_map(Result::ok)
///     .collect();
/// assert_eq!(samples.len(), 1);
/// assert_eq!(samples[0].count_0p3, 10);
/// ```
pub struct FrameDecoder<R>
where
    R: Read,
{
    sync: Synchronizer<R>,
    validate_checksum: bool,
    stats: DecoderStats,
}

impl<R> FrameDecoder<R>
where
    R: Read,
{
    pub fn new(reader: R) -> Self {
        FrameDecoder {
            sync: Synchronizer::pms5003(reader),
            validate_checksum: false,
            stats: DecoderStats::default(),
        }
    }

    /// Drop frames whose transmitted checksum does not match the computed
    /// [checksum]. Disabled by default.
    pub fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    pub fn stats(&self) -> DecoderStats {
        DecoderStats {
            discarded_bytes: self.sync.discarded as u64,
            ..self.stats
        }
    }

    /// Block until the next valid frame is decoded.
    ///
    /// # Errors
    /// Returns `Ok(None)` when the stream reaches EOF. Any other read error is
    /// returned as-is.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut payload = [0u8; Frame::PAYLOAD_LEN as usize];
        loop {
            let Some(offset) = self.sync.scan()? else {
                return Ok(None);
            };

            let Some(len) = self.sync.read_u16()? else {
                return Ok(None);
            };
            if len != Frame::PAYLOAD_LEN {
                debug!(offset, len, "unexpected frame length; resyncing");
                self.stats.bad_length += 1;
                continue;
            }

            if !self.sync.fill(&mut payload)? {
                return Ok(None);
            }
            let Some(frame) = Frame::decode(&payload) else {
                continue;
            };

            if self.validate_checksum {
                let expected = frame_checksum(&payload);
                if expected != frame.checksum {
                    debug!(
                        offset,
                        expected,
                        actual = frame.checksum,
                        "frame checksum mismatch; dropping"
                    );
                    self.stats.bad_checksum += 1;
                    continue;
                }
            }

            self.stats.frames += 1;
            trace!(offset, counts = ?frame.counts, "decoded frame");
            return Ok(Some(frame));
        }
    }

    /// Block until the next valid frame is decoded and return its particle counts.
    ///
    /// # Errors
    /// See [FrameDecoder::next_frame].
    pub fn next_sample(&mut self) -> Result<Option<Sample>> {
        Ok(self.next_frame()?.map(|frame| frame.sample()))
    }
}

// Checksum over the marker, length and payload up to the checksum field.
fn frame_checksum(payload: &[u8]) -> u16 {
    let mut header = super::MAGIC.to_vec();
    header.extend_from_slice(&Frame::PAYLOAD_LEN.to_be_bytes());
    checksum(&header).wrapping_add(checksum(&payload[..payload.len() - 2]))
}

impl<R> Iterator for FrameDecoder<R>
where
    R: Read,
{
    type Item = Result<Sample>;

    /// Decoded samples. The iterator ends at EOF, but any other error is passed on.
    fn next(&mut self) -> Option<Self::Item> {
        self.next_sample().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_bytes(counts: [u16; 6]) -> Vec<u8> {
        let mut dat = vec![0x42, 0x4d, 0x00, 0x1c];
        let mut words = vec![1u16, 2, 3, 4, 5, 6];
        words.extend_from_slice(&counts);
        words.push(0);
        for w in words {
            dat.extend_from_slice(&w.to_be_bytes());
        }
        let sum = checksum(&dat);
        dat.extend_from_slice(&sum.to_be_bytes());
        dat
    }

    #[test]
    fn decodes_single_frame() {
        let dat = frame_bytes([10, 8, 5, 2, 1, 0]);
        assert_eq!(dat.len(), Frame::LEN);
        let mut decoder = FrameDecoder::new(&dat[..]);

        let sample = decoder.next_sample().unwrap().unwrap();
        assert_eq!(sample.counts(), [10, 8, 5, 2, 1, 0]);
        assert!(decoder.next_sample().unwrap().is_none());
        assert_eq!(decoder.stats().frames, 1);
    }

    #[test]
    fn frame_keeps_concentrations() {
        let dat = frame_bytes([10, 8, 5, 2, 1, 0]);
        let frame = FrameDecoder::new(&dat[..]).next_frame().unwrap().unwrap();
        assert_eq!(frame.standard.pm1_0, 1);
        assert_eq!(frame.atmospheric.pm10, 6);
    }

    #[test]
    fn bad_length_consumes_only_header() {
        // A frame with a bad length whose payload hides a valid frame.
        let good = frame_bytes([7, 6, 5, 4, 3, 2]);
        let mut dat = vec![0x42, 0x4d, 0x00, 0x1d];
        dat.extend_from_slice(&good);

        let samples: Vec<Sample> = FrameDecoder::new(&dat[..]).map(Result::unwrap).collect();
        assert_eq!(samples, vec![Sample::from_counts([7, 6, 5, 4, 3, 2])]);
    }

    #[test]
    fn bad_length_is_counted() {
        let dat = [0x42, 0x4d, 0x00, 0x00];
        let mut decoder = FrameDecoder::new(&dat[..]);
        assert!(decoder.next_sample().unwrap().is_none());
        assert_eq!(decoder.stats().bad_length, 1);
        assert_eq!(decoder.stats().frames, 0);
    }

    #[test]
    fn truncated_frame_is_eof() {
        let dat = frame_bytes([1, 1, 1, 1, 1, 1]);
        let mut decoder = FrameDecoder::new(&dat[..dat.len() - 1]);
        assert!(decoder.next_sample().unwrap().is_none());
    }

    #[test]
    fn checksum_ignored_by_default() {
        let mut dat = frame_bytes([1, 2, 3, 4, 5, 6]);
        let n = dat.len();
        dat[n - 1] ^= 0xff;
        let mut decoder = FrameDecoder::new(&dat[..]);
        assert!(decoder.next_sample().unwrap().is_some());
    }

    #[test]
    fn checksum_validation_drops_corrupt_frame() {
        let mut dat = frame_bytes([1, 2, 3, 4, 5, 6]);
        let n = dat.len();
        dat[n - 1] ^= 0xff;
        dat.extend_from_slice(&frame_bytes([6, 5, 4, 3, 2, 1]));

        let mut decoder = FrameDecoder::new(&dat[..]).with_checksum_validation(true);
        let sample = decoder.next_sample().unwrap().unwrap();
        assert_eq!(sample.counts(), [6, 5, 4, 3, 2, 1]);
        assert_eq!(decoder.stats().bad_checksum, 1);
    }

    #[test]
    fn frame_checksum_matches_full_frame_sum() {
        let dat = frame_bytes([9, 9, 9, 9, 9, 9]);
        assert_eq!(
            frame_checksum(&dat[4..]),
            checksum(&dat[..Frame::LEN - 2])
        );
    }
}
