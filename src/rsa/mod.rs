// RSA Module - Main module file
// Exports the arithmetic and key generation engine

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod primality;
pub mod random;

pub use bigint::{extended_euclid, mod_inverse, mod_pow, RsaBigInt};
pub use decrypt::decode;
pub use encrypt::encode;
pub use error::{RsaError, RsaResult};
pub use keygen::{generate_keypair, KeyGenerator, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use primality::{is_prime, DEFAULT_ROUNDS};
pub use random::RandomSource;
