//! Sequential decoding of packed digit storage.

use crate::error::Error;
use crate::source::ChunkSource;
use std::io::{self, Read};

/// Streams the digits of a packed-representation [`ChunkSource`] as ASCII
/// characters.
///
/// The stream owns a single forward-only cursor starting at digit 0; each
/// `read` pulls at most one chunk from the source and never revisits
/// earlier positions. Because the source only accepts even offsets and
/// sizes, a digit fetched but not yet delivered is carried over to the
/// next call, so odd-length read buffers lose nothing. End-of-data
/// surfaces as the usual `Ok(0)`.
///
/// Text sources are not streamable this way: lenient parsing can shrink a
/// chunk, which would desynchronize the digit cursor from the byte offset
/// it addresses.
pub struct DigitStream<S> {
    source: S,
    /// Index of the next digit to deliver. Even whenever `pending` is
    /// empty, which keeps every fetch aligned.
    next_index: i64,
    /// ASCII digit fetched for `next_index` but not yet delivered.
    pending: Option<u8>,
}

impl<S: ChunkSource> DigitStream<S> {
    /// Start a stream at digit index 0.
    pub fn new(source: S) -> Self {
        Self {
            source,
            next_index: 0,
            pending: None,
        }
    }

    /// Digit index of the next character `read` will produce.
    pub fn position(&self) -> i64 {
        self.next_index
    }
}

impl<S: ChunkSource> Read for DigitStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut written = 0;
        if let Some(ch) = self.pending.take() {
            buf[written] = ch;
            written += 1;
            self.next_index += 1;
            if written == buf.len() {
                return Ok(written);
            }
        }

        // One aligned fetch per call: round the want up to even, clamp to
        // the even floor of the source's cap.
        let wanted = buf.len() - written;
        let request = (wanted + wanted % 2).min(self.source.max_chunk_size() & !1);
        if request == 0 {
            return Ok(written);
        }

        // A real I/O failure keeps its kind through the adapter.
        let chunk = self
            .source
            .get_chunk(self.next_index, request)
            .map_err(|e| match e {
                Error::Io(inner) => inner,
                other => io::Error::other(other),
            })?;

        for digit in chunk.digit_values() {
            let ch = digit + b'0';
            if written < buf.len() {
                buf[written] = ch;
                written += 1;
                self.next_index += 1;
            } else {
                // At most one digit can overshoot the buffer.
                self.pending = Some(ch);
            }
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunk, Representation};
    use crate::source::UncachedChunkSource;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const PACKED_PI: &[u8] = &[0x31, 0x41, 0x59, 0x26, 0x53, 0x59];

    fn pi_source(max_size: usize) -> (NamedTempFile, UncachedChunkSource) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PACKED_PI).unwrap();
        file.flush().unwrap();
        let source = UncachedChunkSource::new(file.path(), Representation::Packed, max_size);
        (file, source)
    }

    #[test]
    fn test_reads_ascii_digits_in_order() {
        let (_file, source) = pi_source(512);
        let mut stream = DigitStream::new(source);

        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        assert_eq!(out, "314159265359");
    }

    #[test]
    fn test_odd_buffer_sizes_lose_nothing() {
        let (_file, source) = pi_source(512);
        let mut stream = DigitStream::new(source);

        let mut collected = Vec::new();
        let mut buf = [0u8; 5];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            collected.extend_from_slice(&buf[..n]);
        }
        assert_eq!(collected, b"314159265359");
    }

    #[test]
    fn test_single_byte_reads() {
        let (_file, source) = pi_source(512);
        let mut stream = DigitStream::new(source);

        let mut buf = [0u8; 1];
        let mut collected = Vec::new();
        while stream.read(&mut buf).unwrap() == 1 {
            collected.push(buf[0]);
        }
        assert_eq!(collected, b"314159265359");
    }

    #[test]
    fn test_requests_are_clamped_to_the_source_cap() {
        // Cap of 4 digits per fetch; a 100-byte buffer still fills in
        // partial reads instead of erroring.
        let (_file, source) = pi_source(4);
        let mut stream = DigitStream::new(source);

        let mut buf = [0u8; 100];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"3141");

        let n = stream.read(&mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"5926");
    }

    #[test]
    fn test_exhaustion_is_zero_then_stays_zero() {
        let (_file, source) = pi_source(512);
        let mut stream = DigitStream::new(source);

        let mut buf = [0u8; 64];
        assert_eq!(stream.read(&mut buf).unwrap(), 12);
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_position_tracks_delivered_digits() {
        let (_file, source) = pi_source(512);
        let mut stream = DigitStream::new(source);
        assert_eq!(stream.position(), 0);

        let mut buf = [0u8; 3];
        stream.read(&mut buf).unwrap();
        assert_eq!(stream.position(), 3);

        stream.read(&mut buf).unwrap();
        assert_eq!(stream.position(), 6);
    }

    struct DeniedSource;

    impl ChunkSource for DeniedSource {
        fn get_chunk(&self, _first_index: i64, _size: usize) -> crate::error::Result<Chunk> {
            Err(Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")))
        }

        fn available_digits(&self) -> crate::error::Result<i64> {
            Ok(0)
        }

        fn max_chunk_size(&self) -> usize {
            512
        }
    }

    #[test]
    fn test_io_errors_keep_their_kind() {
        let mut stream = DigitStream::new(DeniedSource);

        let mut buf = [0u8; 4];
        let err = stream.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
