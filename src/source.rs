use anyhow::{bail, Context, Result};
use async_stream::try_stream;
use byteorder::{ByteOrder, LittleEndian};
use futures::stream::Stream;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::crc::{compute, Crc16};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Chunk sizes must lie in `1..=MAX_CHUNK_SIZE`. A zero-length read buffer
/// is indistinguishable from EOF.
pub fn validate_chunk_size(chunk_size: usize) -> io::Result<usize> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Chunk size {} is outside 1..={}", chunk_size, MAX_CHUNK_SIZE),
        ));
    }
    Ok(chunk_size)
}

/// Where the bytes to checksum come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Stdin,
    Text(String),
    Hex(String),
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::File(path) => write!(f, "{}", path.display()),
            Input::Stdin => write!(f, "-"),
            Input::Text(text) => write!(f, "{:?}", text),
            Input::Hex(digits) => write!(f, "0x{}", strip_hex_prefix(digits)),
        }
    }
}

fn strip_hex_prefix(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Decodes a hex string. Whitespace, `:` and `-` between digit pairs are
/// ignored; anything else that is not a hex digit is rejected.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let digits: String = strip_hex_prefix(input)
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != ':' && *c != '-')
        .collect();

    if digits.len() % 2 != 0 {
        bail!("Invalid hex input {:?}: odd number of digits", input);
    }

    hex::decode(&digits).with_context(|| format!("Invalid hex input {:?}", input))
}

/// Reads `reader` to EOF in chunks of at most `chunk_size` bytes. An invalid
/// chunk size surfaces as an `InvalidInput` error on the first poll.
pub fn chunk_stream<R>(mut reader: R, chunk_size: usize) -> impl Stream<Item = io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    try_stream! {
        let chunk_size = validate_chunk_size(chunk_size)?;
        let mut buffer = vec![0u8; chunk_size];
        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            yield buffer[..n].to_vec();
        }
    }
}

/// Feeds every chunk of `reader` into a fresh register.
pub async fn checksum_reader<R>(reader: R, chunk_size: usize) -> io::Result<u16>
where
    R: AsyncRead + Unpin,
{
    let chunk_size = validate_chunk_size(chunk_size)?;
    let mut crc = Crc16::new();
    let mut total = 0usize;
    let chunks = chunk_stream(reader, chunk_size);
    tokio::pin!(chunks);

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        total += chunk.len();
        crc.feed(&chunk);
    }

    debug!("Processed {} bytes", total);
    Ok(crc.result())
}

pub async fn checksum_input(input: &Input, chunk_size: usize) -> Result<u16> {
    let chunk_size = validate_chunk_size(chunk_size)?;

    let crc = match input {
        Input::File(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            info!("Reading {}", path.display());
            checksum_reader(file, chunk_size)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
        Input::Stdin => {
            info!("Reading standard input");
            checksum_reader(tokio::io::stdin(), chunk_size)
                .await
                .context("Failed to read standard input")?
        }
        Input::Text(text) => compute(text.as_bytes()),
        Input::Hex(digits) => compute(&parse_hex(digits)?),
    };

    Ok(crc)
}

/// The checksum in the order a Modbus frame carries it, low byte first.
pub fn wire_bytes(crc: u16) -> [u8; 2] {
    let mut buf = [0u8; 2];
    LittleEndian::write_u16(&mut buf, crc);
    buf
}
