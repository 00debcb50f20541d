//! File-backed chunk access.

use crate::chunk::{Chunk, Representation, TextParsing};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Random access to chunks of a stored digit sequence.
///
/// Implementations are stateless between calls: no cursor, no cache,
/// no held file handle. A source can therefore serve concurrent callers
/// without any locking.
pub trait ChunkSource: Send + Sync {
    /// Fetch the chunk of `size` digits starting at `first_index`.
    ///
    /// A request reaching past end-of-data comes back truncated, possibly
    /// empty, rather than failing.
    fn get_chunk(&self, first_index: i64, size: usize) -> Result<Chunk>;

    /// Total number of digits the backing file holds.
    fn available_digits(&self) -> Result<i64>;

    /// Largest chunk size a single `get_chunk` call will serve.
    fn max_chunk_size(&self) -> usize;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &S {
    fn get_chunk(&self, first_index: i64, size: usize) -> Result<Chunk> {
        (**self).get_chunk(first_index, size)
    }

    fn available_digits(&self) -> Result<i64> {
        (**self).available_digits()
    }

    fn max_chunk_size(&self) -> usize {
        (**self).max_chunk_size()
    }
}

/// A [`ChunkSource`] reading straight from a file, one open handle per
/// call, closed on every exit path.
pub struct UncachedChunkSource {
    path: PathBuf,
    representation: Representation,
    max_size: usize,
    text_parsing: TextParsing,
}

impl UncachedChunkSource {
    /// Create a source over `path` holding digits in `representation`.
    pub fn new(path: impl Into<PathBuf>, representation: Representation, max_size: usize) -> Self {
        Self {
            path: path.into(),
            representation,
            max_size,
            text_parsing: TextParsing::default(),
        }
    }

    /// Create a source from a [`SourceConfig`].
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            path: config.path.clone(),
            representation: config.representation,
            max_size: config.max_chunk_size,
            text_parsing: config.text_parsing,
        }
    }

    /// Set the non-digit policy applied to text files.
    pub fn with_text_parsing(mut self, parsing: TextParsing) -> Self {
        self.text_parsing = parsing;
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkSource for UncachedChunkSource {
    fn get_chunk(&self, first_index: i64, size: usize) -> Result<Chunk> {
        // The cap is enforced before the file is touched.
        if size > self.max_size {
            return Err(Error::ChunkTooLarge {
                size,
                max: self.max_size,
            });
        }

        tracing::debug!(
            path = %self.path.display(),
            first_index,
            size,
            representation = ?self.representation,
            "reading chunk"
        );

        let mut file = File::open(&self.path)?;
        match self.representation {
            Representation::Packed => Chunk::read_packed(&mut file, first_index, size),
            Representation::Text => {
                Chunk::read_text(&mut file, first_index, size, self.text_parsing)
            }
        }
    }

    fn available_digits(&self) -> Result<i64> {
        let len = std::fs::metadata(&self.path)?.len();
        // Saturate at i64::MAX rather than wrapping to negative
        let bytes = i64::try_from(len).unwrap_or(i64::MAX);
        Ok(match self.representation {
            Representation::Packed => bytes.saturating_mul(2),
            Representation::Text => bytes,
        })
    }

    fn max_chunk_size(&self) -> usize {
        self.max_size
    }
}
