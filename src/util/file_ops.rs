// File Operations for Message Batches
// Loads, parses and synthesizes the integer messages fed to the batch processor

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use num_integer::Integer;
use num_traits::{One, Zero};
use thiserror::Error;

use crate::rsa::{RandomSource, RsaBigInt};

/// Errors that can occur while loading a message batch
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("message source {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed message source: {reason}")]
    Malformed { reason: String },
}

/// Result type for message sources
pub type SourceResult<T> = Result<T, SourceError>;

/// Bits per chunk and chunk count of a synthetic message
const SYNTHETIC_CHUNK_BITS: u32 = 30;
const SYNTHETIC_CHUNKS: usize = 10;

/// Bring a message into `[1, n)`.
///
/// Values at or above n (or negative) are reduced modulo n; a zero result
/// becomes 1 since 0 is a fixed point of every exponent.
pub fn reduce_message(message: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    let reduced = message.mod_floor(modulus);
    if reduced.is_zero() {
        RsaBigInt::one()
    } else {
        reduced
    }
}

/// Parse a message list: a count followed by that many integer literals,
/// separated by any whitespace.
pub fn parse_messages(text: &str, modulus: &RsaBigInt) -> SourceResult<Vec<RsaBigInt>> {
    let mut tokens = text.split_whitespace();

    let count_token = tokens.next().ok_or_else(|| SourceError::Malformed {
        reason: "empty source, expected a message count".to_string(),
    })?;
    let count: usize = count_token.parse().map_err(|_| SourceError::Malformed {
        reason: format!("invalid message count {:?}", count_token),
    })?;

    // The count is untrusted until the tokens behind it have been read
    let mut messages = Vec::new();
    for index in 0..count {
        let token = tokens.next().ok_or_else(|| SourceError::Malformed {
            reason: format!("expected {} messages, found {}", count, index),
        })?;
        let value: RsaBigInt = token.parse().map_err(|_| SourceError::Malformed {
            reason: format!("message {} is not an integer: {:?}", index + 1, token),
        })?;
        messages.push(reduce_message(&value, modulus));
    }

    let extra = tokens.count();
    if extra > 0 {
        warn!("ignoring {} tokens after the {} declared messages", extra, count);
    }

    Ok(messages)
}

/// Read and parse a message file
pub fn load_messages(path: &Path, modulus: &RsaBigInt) -> SourceResult<Vec<RsaBigInt>> {
    let text = fs::read_to_string(path).map_err(|source| SourceError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_messages(&text, modulus)
}

/// Synthetic batch of `count` messages, each assembled from ten 30-bit draws
/// and then reduced into `[1, n)`.
pub fn generate_messages(count: usize, modulus: &RsaBigInt, rng: &RandomSource) -> Vec<RsaBigInt> {
    let mask = (1u32 << SYNTHETIC_CHUNK_BITS) - 1;
    (0..count)
        .map(|_| {
            let mut message = RsaBigInt::zero();
            for _ in 0..SYNTHETIC_CHUNKS {
                message = (message << SYNTHETIC_CHUNK_BITS) + (rng.next_u32() & mask);
            }
            reduce_message(&message, modulus)
        })
        .collect()
}
