use std::io::{self, ErrorKind};

/// Bytes provides the ability to read bytes from a reader and push them
/// back if they are not needed, i.e., Peek-and-push. The original order of
/// the bytes is preserved when pushing bytes back.
pub(crate) struct Bytes<R>
where
    R: io::Read,
{
    reader: R,
    num_read: usize,
    // Pushed-back bytes, stored in reverse so the next byte is at the end
    cache: Vec<u8>,
    buf: [u8; 1],
}

impl<R> Bytes<R>
where
    R: io::Read,
{
    pub fn new(reader: R) -> Self {
        Bytes {
            reader,
            num_read: 0,
            cache: Vec::new(),
            buf: [0u8; 1],
        }
    }

    /// Next byte from the cache or the reader.
    ///
    /// # Errors
    /// [ErrorKind::UnexpectedEof] if the reader is exhausted, otherwise any reader error.
    pub fn next(&mut self) -> io::Result<u8> {
        if let Some(b) = self.cache.pop() {
            return Ok(b);
        }
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return Err(io::Error::from(ErrorKind::UnexpectedEof)),
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        self.num_read += 1;
        Ok(self.buf[0])
    }

    /// Fill `buf` completely, first from pushed-back bytes then from the reader.
    ///
    /// Returns `false` if the reader hit EOF before `buf` could be filled.
    pub fn fill(&mut self, buf: &mut [u8]) -> io::Result<bool> {
        let cached = self.cache.len().min(buf.len());
        for dst in buf.iter_mut().take(cached) {
            // cached is bounded by cache.len()
            *dst = self.cache.pop().unwrap_or_default();
        }
        if cached == buf.len() {
            return Ok(true);
        }

        if let Err(err) = self.reader.read_exact(&mut buf[cached..]) {
            if err.kind() == ErrorKind::UnexpectedEof {
                return Ok(false);
            }
            return Err(err);
        }
        self.num_read += buf.len() - cached;
        Ok(true)
    }

    /// Read a big-endian u16, or `None` on EOF.
    pub fn read_u16(&mut self) -> io::Result<Option<u16>> {
        let mut buf = [0u8; 2];
        if !self.fill(&mut buf)? {
            return Ok(None);
        }
        Ok(Some(u16::from_be_bytes(buf)))
    }

    /// Push bytes back such that `dat[0]` is the next byte returned.
    pub fn push(&mut self, dat: &[u8]) {
        self.cache.extend(dat.iter().rev());
    }

    /// Number of bytes consumed from the stream, not counting pushed-back bytes.
    pub fn offset(&self) -> usize {
        self.num_read - self.cache.len()
    }
}
