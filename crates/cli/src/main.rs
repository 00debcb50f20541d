//! Command-line companion for the pi digit server.

mod api_client;

use anyhow::{Context, Result};
use api_client::ApiClient;
use clap::{Parser, Subcommand};
use piwell_core::chunk::Chunk;
use piwell_core::{
    DEFAULT_MAX_CHUNK_SIZE, Representation, TextParsing, UncachedChunkSource, search,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "piwellctl")]
#[command(about = "Command-line companion for the pi digit server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a text digit file to the packed format
    Compress {
        /// Text input file, one ASCII digit per byte
        input: PathBuf,
        /// Packed output file, two digits per byte
        output: PathBuf,
        /// Digits converted per read, must be even
        #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_SIZE)]
        chunk_size: usize,
        /// Fail on non-digit bytes instead of dropping them
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Search for a digit string in a packed file
    Search {
        /// Digit string to look for
        digits: String,
        /// Packed pi file to search
        #[arg(short, long, default_value = "pi.bin")]
        pi: PathBuf,
    },
    /// Show settings of a running server
    Status {
        /// Server API URL
        #[arg(long, env = "PIWELL_SERVER", default_value = "http://127.0.0.1:8080")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Compress {
            input,
            output,
            chunk_size,
            strict,
        } => handle_compress_command(&input, &output, chunk_size, strict),
        Commands::Search { digits, pi } => handle_search_command(&digits, &pi),
        Commands::Status { server } => handle_status_command(&server).await,
    }
}

fn handle_compress_command(
    input: &Path,
    output: &Path,
    chunk_size: usize,
    strict: bool,
) -> Result<()> {
    if chunk_size == 0 || chunk_size % 2 != 0 {
        anyhow::bail!("chunk size must be even and non-zero, got {chunk_size}");
    }

    let parsing = if strict {
        TextParsing::Strict
    } else {
        TextParsing::Lenient
    };

    let mut in_file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let input_len = in_file
        .metadata()
        .with_context(|| format!("failed to stat {}", input.display()))?
        .len();
    let out_file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(out_file);

    // The cursor is a byte offset into the text file and strides by the
    // window size, not by the decoded digit count: lenient parsing can
    // shrink a window, and re-reading shared bytes would duplicate digits.
    // The carry buffer keeps pairs split across windows intact, the packed
    // format cannot carry an unpaired digit between writes.
    let mut carry: Vec<u8> = Vec::with_capacity(chunk_size + 1);
    let mut digits_written: u64 = 0;
    let mut cursor: i64 = 0;

    while (cursor as u64) < input_len {
        let chunk = Chunk::read_text(&mut in_file, cursor, chunk_size, parsing)?;
        cursor += chunk_size as i64;

        carry.extend_from_slice(&chunk.digit_values());
        let paired = carry.len() - carry.len() % 2;
        if paired > 0 {
            let out_chunk = Chunk::Unpacked {
                first_index: digits_written as i64,
                digits: carry[..paired].to_vec(),
            };
            out_chunk.write_to(Representation::Packed, &mut writer)?;
            digits_written += paired as u64;
            carry.drain(..paired);
        }
    }

    writer.flush().context("failed to flush output")?;

    if let Some(digit) = carry.first() {
        eprintln!(
            "Warning: dropping trailing digit {digit}, the packed format stores digit pairs."
        );
    }

    println!(
        "Compressed {} digits from {} into {}.",
        digits_written,
        input.display(),
        output.display()
    );

    Ok(())
}

fn handle_search_command(digits: &str, pi: &Path) -> Result<()> {
    let source = UncachedChunkSource::new(pi, Representation::Packed, DEFAULT_MAX_CHUNK_SIZE);

    match search(&source, digits)? {
        Some(position) => println!("Found \"{digits}\" at position {position}."),
        None => println!("Could not find \"{digits}\"."),
    }

    Ok(())
}

async fn handle_status_command(server: &str) -> Result<()> {
    let client = ApiClient::new(server)?;
    let settings = client.get_settings().await?;

    println!("Server Settings:");
    println!("  Available digits: {}", settings.available_digits);
    println!("  Max chunk size: {}", settings.max_chunk_size);

    Ok(())
}
