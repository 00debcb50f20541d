//! Configuration types shared across crates.

use crate::chunk::{Representation, TextParsing};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Digit source configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the backing digit file.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// On-disk encoding of the backing file.
    #[serde(default)]
    pub representation: Representation,
    /// Largest chunk size a single request may ask for, in digits.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
    /// Handling of non-digit bytes in text files.
    #[serde(default)]
    pub text_parsing: TextParsing,
}

fn default_path() -> PathBuf {
    PathBuf::from("pi.bin")
}

fn default_max_chunk_size() -> usize {
    crate::DEFAULT_MAX_CHUNK_SIZE
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            representation: Representation::default(),
            max_chunk_size: default_max_chunk_size(),
            text_parsing: TextParsing::default(),
        }
    }
}

impl SourceConfig {
    /// Validate source configuration invariants.
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        // Chunk requests are digit pairs; an odd or sub-pair cap could
        // never serve one.
        if self.max_chunk_size < 2 || self.max_chunk_size % 2 != 0 {
            return Err(format!(
                "source.max_chunk_size {} must be an even number of at least 2",
                self.max_chunk_size
            ));
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Digit source configuration.
    #[serde(default)]
    pub source: SourceConfig,
}

impl AppConfig {
    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()
    }

    /// Create a test configuration over the given digit file.
    ///
    /// **For testing only.** Uses the packed representation and default
    /// limits.
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig::default(),
            source: SourceConfig {
                path: path.into(),
                ..SourceConfig::default()
            },
        }
    }
}
