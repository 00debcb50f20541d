//! Digit chunks and the packed-nibble codec.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// On-disk encoding of a digit sequence.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Two digits per byte, lower index in the high nibble.
    #[default]
    Packed,
    /// One ASCII digit character per byte.
    Text,
}

/// Policy for non-digit bytes in text sources.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextParsing {
    /// Drop non-digit bytes; the decoded chunk shrinks accordingly.
    #[default]
    Lenient,
    /// Fail on the first non-digit byte.
    Strict,
}

/// A contiguous run of digits in one concrete encoding.
///
/// `first_index` is the zero-based offset of the first stored digit within
/// the full sequence. Chunks are immutable: conversions consume the value
/// and return a new one.
#[derive(Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Two digits per byte, lower index in the high nibble.
    Packed {
        /// Digit offset of the first stored digit.
        first_index: i64,
        /// Raw packed bytes; each holds two digits.
        data: Vec<u8>,
    },
    /// One digit value (0-9) per byte.
    Unpacked {
        /// Digit offset of the first stored digit.
        first_index: i64,
        /// Decoded digit values.
        digits: Vec<u8>,
    },
}

impl Chunk {
    /// Read a chunk of up to `size` digits from packed storage.
    ///
    /// Storage holds two digits per byte, so the stream is positioned at
    /// byte `first_index / 2` and `size / 2` bytes are requested. A stream
    /// that ends early yields a shorter (possibly empty) chunk, which is
    /// normal operation near end-of-data.
    pub fn read_packed<R: Read + Seek>(
        input: &mut R,
        first_index: i64,
        size: usize,
    ) -> Result<Self> {
        validate_request(first_index, size)?;
        input.seek(SeekFrom::Start((first_index / 2) as u64))?;

        let mut data = vec![0u8; size / 2];
        let filled = read_up_to(input, &mut data)?;
        data.truncate(filled);

        Ok(Self::Packed { first_index, data })
    }

    /// Read a chunk of up to `size` digits from one-byte-per-digit text
    /// storage.
    ///
    /// The stream is positioned at byte `first_index` and `size` bytes are
    /// requested. ASCII digit characters decode by subtracting `'0'`;
    /// anything else follows `parsing`. Short reads truncate the chunk as
    /// with [`Chunk::read_packed`].
    pub fn read_text<R: Read + Seek>(
        input: &mut R,
        first_index: i64,
        size: usize,
        parsing: TextParsing,
    ) -> Result<Self> {
        validate_request(first_index, size)?;
        input.seek(SeekFrom::Start(first_index as u64))?;

        let mut raw = vec![0u8; size];
        let filled = read_up_to(input, &mut raw)?;
        raw.truncate(filled);

        let mut digits = Vec::with_capacity(raw.len());
        for (offset, &byte) in raw.iter().enumerate() {
            if byte.is_ascii_digit() {
                digits.push(byte - b'0');
            } else if parsing == TextParsing::Strict {
                return Err(Error::InvalidDigit {
                    byte,
                    position: first_index + offset as i64,
                });
            }
        }

        Ok(Self::Unpacked { first_index, digits })
    }

    /// Digit offset of the first stored digit.
    pub fn first_index(&self) -> i64 {
        match self {
            Self::Packed { first_index, .. } | Self::Unpacked { first_index, .. } => *first_index,
        }
    }

    /// Number of digits the chunk holds.
    pub fn len(&self) -> usize {
        match self {
            Self::Packed { data, .. } => data.len() * 2,
            Self::Unpacked { digits, .. } => digits.len(),
        }
    }

    /// Whether the chunk holds no digits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Digit offset of the last stored digit.
    pub fn last_index(&self) -> i64 {
        self.first_index() + self.len() as i64 - 1
    }

    /// Whether the chunk is in the packed encoding.
    pub fn is_packed(&self) -> bool {
        matches!(self, Self::Packed { .. })
    }

    /// Get the digit at absolute offset `index` within the full sequence.
    pub fn digit(&self, index: i64) -> Result<u8> {
        if index < self.first_index() || index > self.last_index() {
            return Err(Error::OutOfRange {
                index,
                first: self.first_index(),
                last: self.last_index(),
            });
        }
        let offset = (index - self.first_index()) as usize;
        Ok(match self {
            Self::Packed { data, .. } => {
                let byte = data[offset / 2];
                if offset % 2 == 0 { byte >> 4 } else { byte & 0x0f }
            }
            Self::Unpacked { digits, .. } => digits[offset],
        })
    }

    /// Decode all stored digits into a flat vector of values (0-9).
    pub fn digit_values(&self) -> Vec<u8> {
        match self {
            Self::Packed { data, .. } => unpack_bytes(data),
            Self::Unpacked { digits, .. } => digits.clone(),
        }
    }

    /// Convert to the packed encoding; a no-op on already-packed chunks.
    ///
    /// A trailing unpaired digit has no byte to live in and is dropped.
    pub fn pack(self) -> Self {
        match self {
            packed @ Self::Packed { .. } => packed,
            Self::Unpacked { first_index, digits } => Self::Packed {
                first_index,
                data: pack_digits(&digits),
            },
        }
    }

    /// Convert to the unpacked encoding; a no-op on already-unpacked chunks.
    pub fn unpack(self) -> Self {
        match self {
            unpacked @ Self::Unpacked { .. } => unpacked,
            Self::Packed { first_index, data } => Self::Unpacked {
                first_index,
                digits: unpack_bytes(&data),
            },
        }
    }

    /// Serialize the chunk to `output` in the requested encoding.
    ///
    /// Packed output writes the raw two-digits-per-byte form; text output
    /// writes one ASCII digit character per digit. A short write is an
    /// error.
    pub fn write_to<W: Write>(&self, representation: Representation, output: &mut W) -> Result<()> {
        match representation {
            Representation::Packed => match self {
                Self::Packed { data, .. } => output.write_all(data)?,
                Self::Unpacked { digits, .. } => output.write_all(&pack_digits(digits))?,
            },
            Representation::Text => {
                let ascii: Vec<u8> = self.digit_values().iter().map(|d| d + b'0').collect();
                output.write_all(&ascii)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packed { first_index, data } => f
                .debug_struct("Chunk::Packed")
                .field("first_index", first_index)
                .field("digits", &(data.len() * 2))
                .finish(),
            Self::Unpacked { first_index, digits } => f
                .debug_struct("Chunk::Unpacked")
                .field("first_index", first_index)
                .field("digits", &digits.len())
                .finish(),
        }
    }
}

fn validate_request(first_index: i64, size: usize) -> Result<()> {
    if first_index < 0 || first_index % 2 != 0 {
        return Err(Error::InvalidFirstIndex(first_index));
    }
    if size == 0 || size % 2 != 0 {
        return Err(Error::InvalidSize(size));
    }
    Ok(())
}

/// Fill `buf` until it is full or the input is exhausted, returning the
/// byte count. A short count means end-of-data, not an error; a single
/// short `read` mid-stream is retried.
fn read_up_to<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Join digit values into packed bytes, two per byte, high nibble first.
/// A trailing unpaired digit is dropped.
fn pack_digits(digits: &[u8]) -> Vec<u8> {
    digits
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect()
}

/// Split packed bytes into digit values, high nibble first.
fn unpack_bytes(data: &[u8]) -> Vec<u8> {
    let mut digits = Vec::with_capacity(data.len() * 2);
    for &byte in data {
        digits.push(byte >> 4);
        digits.push(byte & 0x0f);
    }
    digits
}
