//! Core domain types and shared logic for the pi digit store.
//!
//! This crate defines the data model and algorithms used across all other
//! crates:
//! - Digit chunks in packed and unpacked form, and the codec between them
//! - File-backed, stateless chunk access
//! - Sequential digit streaming over packed storage
//! - Substring search across the digit stream
//!
//! Everything here is synchronous blocking I/O; async callers bridge with
//! their runtime's blocking facility.

pub mod chunk;
pub mod config;
pub mod error;
pub mod search;
pub mod source;
pub mod stream;

pub use chunk::{Chunk, Representation, TextParsing};
pub use config::{AppConfig, ServerConfig, SourceConfig};
pub use error::{Error, Result};
pub use search::{SEARCH_WINDOW, search};
pub use source::{ChunkSource, UncachedChunkSource};
pub use stream::DigitStream;

/// Default maximum chunk size: 512 digits.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 512;
