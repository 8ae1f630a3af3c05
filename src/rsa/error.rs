// RSA Errors
// Failure kinds of the arithmetic and key generation engine

use thiserror::Error;

use super::bigint::RsaBigInt;

/// Result type for the RSA engine
pub type RsaResult<T> = Result<T, RsaError>;

/// Errors raised while generating keys or doing modular arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RsaError {
    /// e is not coprime to p-1 or q-1, or the primes themselves are unusable
    #[error("invalid key parameters: {reason}")]
    InvalidKeyParameters { reason: String },

    #[error("no {bits}-bit prime found after {attempts} attempts")]
    PrimeGenerationExhausted { bits: u32, attempts: u32 },

    #[error("no usable public exponent below phi = {phi}")]
    ExponentNotFound { phi: RsaBigInt },

    /// gcd(value, modulus) != 1
    #[error("{value} has no inverse modulo {modulus}")]
    NoInverse { value: RsaBigInt, modulus: RsaBigInt },

    #[error("invalid bit length {bits}: {reason}")]
    InvalidBitLength { bits: u32, reason: &'static str },
}
