//! Server test utilities.

use piwell_core::Representation;
use piwell_core::chunk::Chunk;
use piwell_core::config::AppConfig;
use piwell_server::{AppState, create_router};
use std::fs::File;
use tempfile::TempDir;

/// First 36 digits of pi, the standard fixture sequence.
pub const PI_DIGITS: [u8; 36] = [
    3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3, 2, 3, 8, 4, 6, 2, 6, 4, 3, 3, 8, 3, 2, 7, 9,
    5, 0, 2, 8, 8,
];

/// A test server wrapper over a temporary digit file.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server over a packed file of the standard pi digits.
    pub fn new() -> Self {
        Self::with_digits(&PI_DIGITS)
    }

    /// Create a test server over a packed file of the given digits.
    ///
    /// The digit count must be even, the packed format cannot represent a
    /// trailing unpaired digit.
    pub fn with_digits(digits: &[u8]) -> Self {
        Self::build(digits, |_| {})
    }

    /// Create a test server with custom config modifications.
    pub fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        Self::build(&PI_DIGITS, modifier)
    }

    /// Create a test server over a text-representation file with raw contents.
    pub fn with_text_file(contents: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let pi_path = temp_dir.path().join("pi.txt");
        std::fs::write(&pi_path, contents).expect("Failed to write digit file");

        let mut config = AppConfig::for_testing(&pi_path);
        config.source.representation = Representation::Text;

        let state = AppState::new(config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    fn build<F>(digits: &[u8], modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        // Pack the fixture digits the same way the compressor would.
        let pi_path = temp_dir.path().join("pi.bin");
        let chunk = Chunk::Unpacked {
            first_index: 0,
            digits: digits.to_vec(),
        };
        let mut file = File::create(&pi_path).expect("Failed to create digit file");
        chunk
            .write_to(Representation::Packed, &mut file)
            .expect("Failed to write digit file");

        let mut config = AppConfig::for_testing(&pi_path);
        modifier(&mut config);

        let state = AppState::new(config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }
}
