// RSA Key Generation
// Random primes, public exponent selection and (e, n) / (d, n) key pairs

use std::fmt;

use log::debug;
use num_integer::Integer;
use num_traits::{One, Signed};

use super::bigint::{from_u64, is_coprime, mod_inverse, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::primality::{is_prime, DEFAULT_ROUNDS};
use super::random::RandomSource;

/// Upper bound on candidates drawn by [`KeyGenerator::generate_prime`]
pub const MAX_PRIME_ATTEMPTS: u32 = 10_000;

/// Conventional public exponents, tried in this order
const COMMON_EXPONENTS: [u64; 4] = [65537, 257, 17, 3];

/// Smallest modulus [`KeyGenerator::generate`] accepts
pub const MIN_MODULUS_BITS: u32 = 16;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    e: RsaBigInt, // Public exponent
    n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    d: RsaBigInt, // Private exponent
    n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encode a message using this public key
    pub fn encode(&self, message: &RsaBigInt) -> RsaBigInt {
        super::encrypt::encode(message, self)
    }
}

impl RsaPrivateKey {
    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decode a ciphertext using this private key
    pub fn decode(&self, cipher: &RsaBigInt) -> RsaBigInt {
        super::decrypt::decode(cipher, self)
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("d", &"<redacted>")
            .field("n", &self.n)
            .finish()
    }
}

impl RsaKeyPair {
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }

    /// Encode then decode, reporting whether the message came back unchanged
    pub fn round_trip(&self, message: &RsaBigInt) -> bool {
        let cipher = self.public_key.encode(message);
        &self.private_key.decode(&cipher) == message
    }
}

/// Build a key pair from two primes and a public exponent.
///
/// e must be coprime to both p-1 and q-1; anything else is rejected with
/// [`RsaError::InvalidKeyParameters`] rather than adjusted.
pub fn generate_keypair(p: &RsaBigInt, q: &RsaBigInt, e: &RsaBigInt) -> RsaResult<RsaKeyPair> {
    let two = from_u64(2);
    if p < &two || q < &two {
        return Err(RsaError::InvalidKeyParameters {
            reason: format!("p = {} and q = {} must both be at least 2", p, q),
        });
    }
    if p == q {
        return Err(RsaError::InvalidKeyParameters {
            reason: format!("p and q must be distinct, both are {}", p),
        });
    }
    if !e.is_positive() {
        return Err(RsaError::InvalidKeyParameters {
            reason: format!("e = {} must be positive", e),
        });
    }

    let p_minus_1 = p - 1u8;
    let q_minus_1 = q - 1u8;
    if !is_coprime(e, &p_minus_1) || !is_coprime(e, &q_minus_1) {
        return Err(RsaError::InvalidKeyParameters {
            reason: format!(
                "e = {} is not coprime with p-1 = {} and q-1 = {}",
                e, p_minus_1, q_minus_1
            ),
        });
    }

    let n = p * q;

    // Euler's totient
    let phi = &p_minus_1 * &q_minus_1;
    let d = mod_inverse(e, &phi)?;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { e: e.clone(), n: n.clone() },
        private_key: RsaPrivateKey { d, n },
    })
}

/// Prime and exponent generator around one [`RandomSource`].
///
/// Key generation runs strictly before any batch work, so a single owner is
/// enough; the source still serializes its own draws.
#[derive(Debug)]
pub struct KeyGenerator {
    rng: RandomSource,
    rounds: u32,
    max_attempts: u32,
}

impl KeyGenerator {
    pub fn new(rng: RandomSource) -> Self {
        Self {
            rng,
            rounds: DEFAULT_ROUNDS,
            max_attempts: MAX_PRIME_ATTEMPTS,
        }
    }

    /// Candidate cap for prime searches and for q == p redraws
    pub(crate) fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Miller-Rabin rounds used for every primality check
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn rng(&self) -> &RandomSource {
        &self.rng
    }

    pub fn is_prime(&self, n: &RsaBigInt) -> bool {
        is_prime(n, self.rounds, &self.rng)
    }

    /// Uniformly random `bit_count`-bit integer with the top bit forced to 1.
    ///
    /// Built from 32-bit words, most significant first; the low bit is left
    /// as drawn.
    pub fn generate_random_bits(&self, bit_count: u32) -> RsaResult<RsaBigInt> {
        if bit_count == 0 {
            return Err(RsaError::InvalidBitLength {
                bits: bit_count,
                reason: "must be at least 1",
            });
        }

        let mut result = RsaBigInt::from(0u8);
        for _ in 0..bit_count / 32 {
            result = (result << 32u32) + self.rng.next_u32();
        }

        let remaining = bit_count % 32;
        if remaining > 0 {
            let mask = (1u32 << remaining) - 1;
            result = (result << remaining) + (self.rng.next_u32() & mask);
        }

        if result.bits() < u64::from(bit_count) {
            result += RsaBigInt::one() << (bit_count - 1);
        }
        Ok(result)
    }

    /// Random prime of exactly `bit_count` bits
    pub fn generate_prime(&self, bit_count: u32) -> RsaResult<RsaBigInt> {
        self.find_prime(bit_count, false)
    }

    /// With `top_two` the second-highest bit is forced as well, so the product
    /// of two such primes has exactly twice their bit length.
    fn find_prime(&self, bit_count: u32, top_two: bool) -> RsaResult<RsaBigInt> {
        if bit_count < 2 {
            return Err(RsaError::InvalidBitLength {
                bits: bit_count,
                reason: "primes need at least 2 bits",
            });
        }

        let second_bit = RsaBigInt::one() << (bit_count - 2);
        let top_two_floor = &second_bit * 3u8;

        for attempt in 1..=self.max_attempts {
            let mut candidate = self.generate_random_bits(bit_count)?;
            if top_two && candidate < top_two_floor {
                candidate += &second_bit;
            }
            if candidate.is_even() {
                candidate += 1u8;
            }

            if self.is_prime(&candidate) {
                debug!("found {}-bit prime after {} attempts", bit_count, attempt);
                return Ok(candidate);
            }
        }

        Err(RsaError::PrimeGenerationExhausted {
            bits: bit_count,
            attempts: self.max_attempts,
        })
    }

    /// Modulus-sized prime different from `other`
    fn generate_distinct_prime(&self, other: &RsaBigInt, bit_count: u32) -> RsaResult<RsaBigInt> {
        for _ in 0..self.max_attempts {
            let prime = self.find_prime(bit_count, true)?;
            if &prime != other {
                return Ok(prime);
            }
        }

        Err(RsaError::PrimeGenerationExhausted {
            bits: bit_count,
            attempts: self.max_attempts,
        })
    }

    /// Public exponent below phi and coprime to it
    ///
    /// Prefers 65537, 257, 17, 3; otherwise the first prime from 65537 upward
    /// that does not divide phi.
    pub fn generate_exponent(&self, phi: &RsaBigInt) -> RsaResult<RsaBigInt> {
        for e in COMMON_EXPONENTS.iter().map(|&e| from_u64(e)) {
            if &e < phi && is_coprime(&e, phi) {
                return Ok(e);
            }
        }

        let mut candidate = from_u64(65537);
        while &candidate < phi {
            if self.is_prime(&candidate) && is_coprime(&candidate, phi) {
                return Ok(candidate);
            }
            candidate += 2u8;
        }

        Err(RsaError::ExponentNotFound { phi: phi.clone() })
    }

    /// Generate RSA key pair with a modulus of `modulus_bits` bits
    ///
    /// p and q get half the bits each with their top two bits set, so n
    /// always has exactly `modulus_bits` bits; q is redrawn if it collides
    /// with p.
    pub fn generate(&self, modulus_bits: u32) -> RsaResult<RsaKeyPair> {
        if modulus_bits < MIN_MODULUS_BITS {
            return Err(RsaError::InvalidBitLength {
                bits: modulus_bits,
                reason: "modulus must be at least 16 bits",
            });
        }
        if modulus_bits % 2 != 0 {
            return Err(RsaError::InvalidBitLength {
                bits: modulus_bits,
                reason: "must be even (p and q should have equal bit length)",
            });
        }

        let half_bits = modulus_bits / 2;
        let p = self.find_prime(half_bits, true)?;
        let q = self.generate_distinct_prime(&p, half_bits)?;

        let phi = (&p - 1u8) * (&q - 1u8);
        let e = self.generate_exponent(&phi)?;
        debug!("selected public exponent {} for a {}-bit modulus", e, modulus_bits);

        generate_keypair(&p, &q, &e)
    }
}
